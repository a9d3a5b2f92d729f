// pokemon.rs
// Catalog records as the backend serves them, plus the list/favorites envelopes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    // List responses only carry id, name, types and sprites.
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NamedAPIResource {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonType {
    pub r#type: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonAbility {
    pub ability: NamedAPIResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonStat {
    pub stat: NamedAPIResource,
    pub base_stat: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_shiny: Option<String>,
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Artwork {
    pub front_default: Option<String>,
}

/// `GET /pokemon/` body.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonListResponse {
    pub count: u32,
    pub results: Vec<Pokemon>,
}

/// `GET /pokemon/favorites/` body. The backend may wrap it in a paginated
/// envelope; only `results` is read.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FavoritesResponse {
    pub results: Vec<Pokemon>,
}

/// `GET /pokemon/types/` body.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeNamesResponse {
    pub types: Vec<String>,
}

impl Pokemon {
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.r#type.name.as_str())
    }

    /// Official artwork, falling back to the default front sprite.
    pub fn main_image(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|artwork| artwork.front_default.as_deref())
            .or(self.sprites.front_default.as_deref())
    }

    /// `#001` style catalog number.
    pub fn formatted_id(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    pub fn height_m(&self) -> f64 {
        self.height as f64 / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight as f64 / 10.0
    }

    /// Upper bound for stat bars: the largest base stat, never below 100.
    pub fn max_stat(&self) -> i32 {
        self.stats
            .iter()
            .map(|s| s.base_stat)
            .max()
            .unwrap_or(0)
            .max(100)
    }
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "special-attack" -> "Special Attack"
pub fn title_case(slug: &str) -> String {
    slug.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}
