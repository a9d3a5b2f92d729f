//! Typed wrapper around the backend's REST endpoints.
//!
//! No caching and no retries: every call is one request, and any failure is
//! handed back to the caller as a [`CatalogError`].

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::pokemon::{FavoritesResponse, Pokemon, PokemonListResponse, TypeNamesResponse};

/// Name/type criteria for the list endpoint. Empty means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub name: String,
    pub r#type: String,
}

impl Filters {
    pub fn new(name: &str, r#type: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            r#type: r#type.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.r#type.is_empty()
    }

    /// Query pairs for the list endpoint, with unset criteria omitted.
    pub fn query_pairs(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", page.to_string())];
        if !self.name.is_empty() {
            pairs.push(("name", self.name.clone()));
        }
        if !self.r#type.is_empty() {
            pairs.push(("type", self.r#type.clone()));
        }
        pairs
    }
}

/// One page of the catalog as reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPage {
    pub items: Vec<Pokemon>,
    pub total_count: u32,
}

/// The backend contract the store is written against.
///
/// [`HttpCatalogClient`] talks to the real backend; tests drive the store
/// with scripted implementations.
pub trait CatalogApi: Send + Sync {
    fn list_items(
        &self,
        page: u32,
        filters: &Filters,
    ) -> impl Future<Output = Result<ItemPage, CatalogError>> + Send;

    fn get_item(&self, id: u32) -> impl Future<Output = Result<Pokemon, CatalogError>> + Send;

    fn list_type_names(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;

    fn toggle_favorite(&self, id: u32) -> impl Future<Output = Result<(), CatalogError>> + Send;

    fn list_favorites(&self) -> impl Future<Output = Result<Vec<Pokemon>, CatalogError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout as u64))
            .build()?;

        tracing::debug!(
            "Catalog client for {} with {}s timeout",
            config.api_url,
            config.timeout
        );

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, CatalogError> {
        request.send().await.map_err(|e| {
            tracing::error!("Request to catalog backend failed: {}", e);
            CatalogError::NetworkError(e.to_string())
        })
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CatalogError> {
        let url = response.url().to_string();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url, e);
            CatalogError::NetworkError(e.to_string())
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Failed to parse JSON response from {}: {}", url, e);
            CatalogError::from(e)
        })
    }

    fn ensure_success(response: &reqwest::Response) -> Result<(), CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_msg = format!("{} returned status: {}", response.url(), status);
        tracing::error!("{}", error_msg);
        Err(CatalogError::NetworkError(error_msg))
    }
}

impl CatalogApi for HttpCatalogClient {
    async fn list_items(&self, page: u32, filters: &Filters) -> Result<ItemPage, CatalogError> {
        let url = self.url("/pokemon/");
        tracing::debug!("Listing Pokémon page {} from {} ({:?})", page, url, filters);

        let response = self
            .send(self.http.get(&url).query(&filters.query_pairs(page)))
            .await?;
        Self::ensure_success(&response)?;

        let body: PokemonListResponse = Self::read_json(response).await?;
        tracing::debug!(
            "Received {} Pokémon of {} for page {}",
            body.results.len(),
            body.count,
            page
        );

        Ok(ItemPage {
            items: body.results,
            total_count: body.count,
        })
    }

    async fn get_item(&self, id: u32) -> Result<Pokemon, CatalogError> {
        let url = self.url(&format!("/pokemon/{}/", id));
        tracing::debug!("Fetching Pokémon from URL: {}", url);

        let response = self.send(self.http.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Pokémon {} not found", id);
            return Err(CatalogError::NotFound(id));
        }
        Self::ensure_success(&response)?;

        let pokemon: Pokemon = Self::read_json(response).await?;
        tracing::debug!("Successfully fetched Pokemon: {} (ID: {})", pokemon.name, pokemon.id);
        Ok(pokemon)
    }

    async fn list_type_names(&self) -> Result<Vec<String>, CatalogError> {
        let url = self.url("/pokemon/types/");
        let response = self.send(self.http.get(&url)).await?;
        Self::ensure_success(&response)?;

        let body: TypeNamesResponse = Self::read_json(response).await?;
        Ok(body.types)
    }

    async fn toggle_favorite(&self, id: u32) -> Result<(), CatalogError> {
        let url = self.url(&format!("/pokemon/{}/favorite/", id));
        tracing::debug!("Toggling favorite via {}", url);

        let response = self.send(self.http.post(&url)).await?;
        Self::ensure_success(&response)
    }

    async fn list_favorites(&self) -> Result<Vec<Pokemon>, CatalogError> {
        let url = self.url("/pokemon/favorites/");
        let response = self.send(self.http.get(&url)).await?;
        Self::ensure_success(&response)?;

        let body: FavoritesResponse = Self::read_json(response).await?;
        tracing::debug!("Backend reports {} favorites", body.results.len());
        Ok(body.results)
    }
}
