//! HTML renderers. Every view is a function of a [`StoreSnapshot`] (plus
//! whatever the handler just fetched) and never calls the backend itself.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tera::{Context, Tera};

use crate::client::Filters;
use crate::pokemon::{Pokemon, capitalize, title_case};
use crate::store::{Detail, StoreSnapshot};

const TEMPLATES: [(&str, &str); 7] = [
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("card.html", include_str!("../templates/card.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("detail.html", include_str!("../templates/detail.html")),
    ("favorites.html", include_str!("../templates/favorites.html")),
    ("message.html", include_str!("../templates/message.html")),
];

/// Pages shown in full before the pagination control starts eliding.
const MAX_PAGES_SHOWN: u32 = 5;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum PageItem {
    Page {
        number: u32,
        current: bool,
        href: String,
    },
    Ellipsis,
}

/// Page numbers for the pagination control: everything when there are few
/// pages, otherwise first, last and the current page's neighbours with
/// ellipses between.
pub fn page_numbers(current: u32, total: u32) -> Vec<Option<u32>> {
    if total <= MAX_PAGES_SHOWN {
        return (1..=total).map(Some).collect();
    }

    let mut start = current.saturating_sub(1).max(2);
    let mut end = (current + 1).min(total - 1);
    if current <= 3 {
        end = 4;
    }
    if current >= total - 2 {
        start = total - 3;
    }

    let mut pages = vec![Some(1)];
    if start > 2 {
        pages.push(None);
    }
    pages.extend((start..=end).map(Some));
    if end < total - 1 {
        pages.push(None);
    }
    pages.push(Some(total));
    pages
}

/// Link to a list page that keeps the active filters.
pub fn list_href(page: u32, filters: &Filters) -> String {
    let mut href = format!("/pokemon?page={}", page);
    if !filters.name.is_empty() {
        href.push_str("&name=");
        href.extend(utf8_percent_encode(&filters.name, NON_ALPHANUMERIC));
    }
    if !filters.r#type.is_empty() {
        href.push_str("&type=");
        href.extend(utf8_percent_encode(&filters.r#type, NON_ALPHANUMERIC));
    }
    href
}

/// Bar width for a stat; base stats are 1..=255, anything else is clamped.
fn stat_percent(value: i32, max_stat: i32) -> i32 {
    (value.clamp(0, 255) * 100 / max_stat.max(1)).min(100)
}

fn stat_color(value: i32) -> &'static str {
    match value {
        v if v < 30 => "red",
        v if v < 60 => "orange",
        v if v < 90 => "yellow",
        _ => "green",
    }
}

#[derive(Debug, Serialize)]
struct FilterView<'a> {
    name: &'a str,
    r#type: &'a str,
}

#[derive(Debug, Serialize)]
struct CardView {
    id: u32,
    name: String,
    formatted_id: String,
    image: Option<String>,
    types: Vec<String>,
    favorite: bool,
}

impl CardView {
    fn new(pokemon: &Pokemon, favorite: bool) -> Self {
        Self {
            id: pokemon.id,
            name: pokemon.display_name(),
            formatted_id: pokemon.formatted_id(),
            image: pokemon.main_image().map(str::to_string),
            types: pokemon.type_names().map(str::to_string).collect(),
            favorite,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatView {
    label: String,
    value: i32,
    percent: i32,
    color: &'static str,
}

#[derive(Debug, Serialize)]
struct AbilityView {
    name: String,
    hidden: bool,
}

#[derive(Debug, Serialize)]
struct SpriteView {
    label: &'static str,
    url: String,
}

#[derive(Debug, Serialize)]
struct DetailView {
    #[serde(flatten)]
    card: CardView,
    height_m: String,
    weight_kg: String,
    sprites: Vec<SpriteView>,
    stats: Vec<StatView>,
    abilities: Vec<AbilityView>,
}

impl DetailView {
    fn new(pokemon: &Pokemon, favorite: bool) -> Self {
        let max_stat = pokemon.max_stat();
        let sprites = &pokemon.sprites;

        Self {
            card: CardView::new(pokemon, favorite),
            height_m: format!("{:.1}", pokemon.height_m()),
            weight_kg: format!("{:.1}", pokemon.weight_kg()),
            sprites: [
                ("Front", &sprites.front_default),
                ("Back", &sprites.back_default),
                ("Shiny Front", &sprites.front_shiny),
                ("Shiny Back", &sprites.back_shiny),
            ]
            .into_iter()
            .filter_map(|(label, url)| url.clone().map(|url| SpriteView { label, url }))
            .collect(),
            stats: pokemon
                .stats
                .iter()
                .map(|s| StatView {
                    label: title_case(&s.stat.name),
                    value: s.base_stat,
                    percent: stat_percent(s.base_stat, max_stat),
                    color: stat_color(s.base_stat),
                })
                .collect(),
            abilities: pokemon
                .abilities
                .iter()
                .map(|a| AbilityView {
                    name: title_case(&a.ability.name),
                    hidden: a.is_hidden,
                })
                .collect(),
        }
    }
}

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    fn base_context(snapshot: &StoreSnapshot) -> Context {
        let mut context = Context::new();
        context.insert("loading", &snapshot.loading);
        context.insert("favorites_stale", &snapshot.favorites_stale);
        context
    }

    fn cards(items: &[Pokemon], snapshot: &StoreSnapshot) -> Vec<CardView> {
        items
            .iter()
            .map(|p| CardView::new(p, snapshot.is_favorite(p.id)))
            .collect()
    }

    pub fn home(&self, snapshot: &StoreSnapshot) -> Result<String, tera::Error> {
        self.tera.render("home.html", &Self::base_context(snapshot))
    }

    pub fn list(&self, snapshot: &StoreSnapshot, type_names: &[String]) -> Result<String, tera::Error> {
        let page = &snapshot.page;
        let filters = &snapshot.filters;

        let pages: Vec<PageItem> = page_numbers(page.current_page, page.total_pages)
            .into_iter()
            .map(|number| match number {
                Some(number) => PageItem::Page {
                    number,
                    current: number == page.current_page,
                    href: list_href(number, filters),
                },
                None => PageItem::Ellipsis,
            })
            .collect();
        let prev_href = (page.current_page > 1).then(|| list_href(page.current_page - 1, filters));
        let next_href = (page.current_page < page.total_pages)
            .then(|| list_href(page.current_page + 1, filters));

        let mut context = Self::base_context(snapshot);
        context.insert(
            "filters",
            &FilterView {
                name: &filters.name,
                r#type: &filters.r#type,
            },
        );
        context.insert("type_names", type_names);
        context.insert("error", &snapshot.error.map(|e| e.message()));
        context.insert("cards", &Self::cards(&page.items, snapshot));
        context.insert("return_to", &list_href(page.current_page, filters));
        context.insert("show_pagination", &(page.total_pages > 1));
        context.insert("pages", &pages);
        context.insert("prev_href", &prev_href);
        context.insert("next_href", &next_href);
        self.tera.render("list.html", &context)
    }

    pub fn detail(&self, snapshot: &StoreSnapshot, detail: &Detail) -> Result<String, tera::Error> {
        match detail {
            Detail::Loaded(pokemon) => {
                let mut context = Self::base_context(snapshot);
                context.insert("pokemon", &DetailView::new(pokemon, snapshot.is_favorite(pokemon.id)));
                self.tera.render("detail.html", &context)
            }
            Detail::NotFound(id) => self.message(
                snapshot,
                "Pokémon not found",
                &format!("There is no Pokémon with id {}.", id),
                false,
            ),
            Detail::Failed(error) => {
                self.message(snapshot, &capitalize(error.message()), "Please try again later.", true)
            }
        }
    }

    pub fn favorites(&self, snapshot: &StoreSnapshot) -> Result<String, tera::Error> {
        let mut context = Self::base_context(snapshot);
        context.insert("cards", &Self::cards(&snapshot.favorites, snapshot));
        context.insert("return_to", "/favorites");
        self.tera.render("favorites.html", &context)
    }

    pub fn not_found(&self, snapshot: &StoreSnapshot) -> Result<String, tera::Error> {
        let mut context = Self::base_context(snapshot);
        context.insert("heading", "404 - Page Not Found");
        context.insert("message", "The Pokémon you're looking for has fled into the tall grass.");
        context.insert("is_error", &false);
        context.insert("back_href", "/");
        context.insert("back_label", "Return Home");
        self.tera.render("message.html", &context)
    }

    fn message(
        &self,
        snapshot: &StoreSnapshot,
        heading: &str,
        message: &str,
        is_error: bool,
    ) -> Result<String, tera::Error> {
        let mut context = Self::base_context(snapshot);
        context.insert("heading", heading);
        context.insert("message", message);
        context.insert("is_error", &is_error);
        context.insert("back_href", "/pokemon");
        context.insert("back_label", "Back to Pokémon List");
        self.tera.render("message.html", &context)
    }
}
