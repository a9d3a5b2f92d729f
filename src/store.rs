//! Session-wide catalog state.
//!
//! The store owns the page window, the favorites set, the active filters and
//! the loading/error flags. Views read a [`StoreSnapshot`] and only ever ask
//! the store to change things.
//!
//! Page loads and favorites refreshes are tagged with sequence numbers: a
//! response is applied only if no newer request of the same kind was issued
//! after it, so a slow older request can never overwrite a newer result.

use std::sync::{Mutex, MutexGuard};

use crate::client::{CatalogApi, Filters, ItemPage};
use crate::error::{CatalogError, StoreError};
use crate::pokemon::Pokemon;

pub const PAGE_SIZE: u32 = 20;

/// The currently displayed slice of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    pub items: Vec<Pokemon>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_count: 0,
        }
    }
}

pub fn total_pages(total_count: u32, page_size: u32) -> u32 {
    total_count.div_ceil(page_size.max(1)).max(1)
}

/// How a request ended, from the store's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Applied,
    Failed,
    /// A newer request was issued before this one resolved; its result was dropped.
    Superseded,
}

/// Result of loading a single item for a detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Loaded(Pokemon),
    NotFound(u32),
    Failed(StoreError),
}

/// Read-only copy of the store handed to renderers.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub page: PageWindow,
    pub favorites: Vec<Pokemon>,
    pub filters: Filters,
    pub loading: bool,
    pub error: Option<StoreError>,
    /// Set when a toggle went through but the follow-up favorites read failed.
    pub favorites_stale: bool,
}

impl StoreSnapshot {
    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites.iter().any(|fav| fav.id == id)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    page: PageWindow,
    favorites: Vec<Pokemon>,
    filters: Filters,
    in_flight: usize,
    error: Option<StoreError>,
    favorites_stale: bool,
    page_seq: u64,
    favorites_seq: u64,
}

impl StoreState {
    fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

pub struct CatalogStore<C> {
    api: C,
    page_size: u32,
    state: Mutex<StoreState>,
}

impl<C: CatalogApi> CatalogStore<C> {
    pub fn new(api: C, page_size: u32) -> Self {
        tracing::info!("Initializing catalog store with page size {}", page_size);

        Self {
            api,
            page_size: page_size.max(1),
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn with_defaults(api: C) -> Self {
        Self::new(api, PAGE_SIZE)
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Catalog store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.lock();
        StoreSnapshot {
            page: state.page.clone(),
            favorites: state.favorites.clone(),
            filters: state.filters.clone(),
            loading: state.in_flight > 0,
            error: state.error,
            favorites_stale: state.favorites_stale,
        }
    }

    pub fn filters(&self) -> Filters {
        self.lock().filters.clone()
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.lock().favorites.iter().any(|fav| fav.id == id)
    }

    /// Fetch `page` with the active filters. Pages below 1 are treated as 1.
    pub async fn load_page(&self, page: u32) -> RequestOutcome {
        let filters = self.filters();
        self.fetch_page(page, filters).await
    }

    /// Replace the filter criteria and go back to the first page.
    pub async fn apply_filters(&self, filters: Filters) -> RequestOutcome {
        self.apply_filters_at(filters, 1).await
    }

    /// Fetch `page` under `filters`. The filters become the active ones only
    /// once the page they were fetched with is applied.
    pub async fn apply_filters_at(&self, filters: Filters, page: u32) -> RequestOutcome {
        let filters = Filters::new(&filters.name, &filters.r#type);
        tracing::debug!("Applying filters {:?} at page {}", filters, page);
        self.fetch_page(page, filters).await
    }

    async fn fetch_page(&self, page: u32, filters: Filters) -> RequestOutcome {
        let page = page.max(1);
        let seq = {
            let mut state = self.lock();
            state.page_seq += 1;
            state.begin();
            state.page_seq
        };

        tracing::debug!("Loading page {} (request #{})", page, seq);
        let result = self.api.list_items(page, &filters).await;

        let mut state = self.lock();
        state.finish();
        if seq != state.page_seq {
            tracing::debug!(
                "Dropping page {} response (request #{}, latest #{})",
                page,
                seq,
                state.page_seq
            );
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(ItemPage { items, total_count }) => {
                let total_pages = total_pages(total_count, self.page_size);
                state.page = PageWindow {
                    items,
                    current_page: page.min(total_pages),
                    total_pages,
                    total_count,
                };
                state.filters = filters;
                state.error = None;
                RequestOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Error fetching page {}: {}", page, e);
                state.error = Some(StoreError::CatalogFetch);
                RequestOutcome::Failed
            }
        }
    }

    /// Fetch one item for a detail view. The page window is left alone.
    pub async fn load_item(&self, id: u32) -> Detail {
        self.lock().begin();
        let result = self.api.get_item(id).await;

        let mut state = self.lock();
        state.finish();
        match result {
            Ok(pokemon) => Detail::Loaded(pokemon),
            Err(CatalogError::NotFound(id)) => {
                tracing::debug!("Pokémon {} does not exist", id);
                Detail::NotFound(id)
            }
            Err(e) => {
                tracing::warn!("Error fetching pokemon details for {}: {}", id, e);
                state.error = Some(StoreError::DetailsFetch);
                Detail::Failed(StoreError::DetailsFetch)
            }
        }
    }

    /// Flip `item`'s favorite flag on the backend, then re-read the full
    /// favorites list. Failures are logged, never surfaced as `error`.
    pub async fn toggle_favorite(&self, item: &Pokemon) -> RequestOutcome {
        self.lock().begin();

        if let Err(e) = self.api.toggle_favorite(item.id).await {
            self.lock().finish();
            tracing::warn!("Error toggling favorite for {}: {}", item.id, e);
            return RequestOutcome::Failed;
        }

        let outcome = self.fetch_favorites().await;
        if outcome == RequestOutcome::Failed {
            tracing::warn!(
                "Favorite for {} toggled but favorites could not be re-read; marking stale",
                item.id
            );
            self.lock().favorites_stale = true;
        }
        outcome
    }

    pub async fn refresh_favorites(&self) -> RequestOutcome {
        self.lock().begin();
        self.fetch_favorites().await
    }

    /// Closes the operation opened by the caller's `begin`.
    async fn fetch_favorites(&self) -> RequestOutcome {
        let seq = {
            let mut state = self.lock();
            state.favorites_seq += 1;
            state.favorites_seq
        };

        let result = self.api.list_favorites().await;

        let mut state = self.lock();
        state.finish();
        if seq != state.favorites_seq {
            tracing::debug!("Dropping favorites response #{}", seq);
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(favorites) => {
                tracing::debug!("Favorites set now holds {} entries", favorites.len());
                state.favorites = favorites;
                state.favorites_stale = false;
                RequestOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Error fetching favorites: {}", e);
                RequestOutcome::Failed
            }
        }
    }

    /// Type names for the filter form. Empty on failure.
    pub async fn type_names(&self) -> Vec<String> {
        match self.api.list_type_names().await {
            Ok(types) => types,
            Err(e) => {
                tracing::warn!("Failed to load Pokémon types: {}", e);
                Vec::new()
            }
        }
    }
}
