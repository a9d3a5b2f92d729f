//! Viewer routes. Handlers trigger store operations, then render a view from
//! the resulting snapshot.

use axum::{
    Form, Router, debug_handler,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::client::{Filters, HttpCatalogClient};
use crate::pokemon::Pokemon;
use crate::store::{CatalogStore, Detail};
use crate::views::Views;

pub struct AppState {
    pub store: CatalogStore<HttpCatalogClient>,
    pub views: Views,
}

pub type SharedState = Arc<AppState>;

pub fn router(app_state: SharedState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/pokemon", get(list_handler))
        .route("/pokemon/{id}", get(detail_handler))
        .route("/pokemon/{id}/favorite", post(toggle_favorite_handler))
        .route("/favorites", get(favorites_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn render(result: Result<String, tera::Error>, status: StatusCode) -> Response {
    match result {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    r#type: String,
}

#[derive(Debug, Deserialize)]
struct FavoriteForm {
    return_to: Option<String>,
}

/// Only same-site paths are followed after a toggle.
fn redirect_target(return_to: Option<String>) -> String {
    let same_site = |path: &str| {
        // Browsers read `\` as `/`, so `/\host` is protocol-relative too.
        path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
            && path
                .parse::<Uri>()
                .is_ok_and(|uri| uri.scheme().is_none() && uri.authority().is_none())
    };

    match return_to {
        Some(path) if same_site(&path) => path,
        _ => "/pokemon".to_string(),
    }
}

#[debug_handler]
async fn home_handler(State(app_state): State<SharedState>) -> Response {
    render(
        app_state.views.home(&app_state.store.snapshot()),
        StatusCode::OK,
    )
}

/// The filter form sends no page, so new criteria start at page 1; links
/// carrying both criteria and a page land on that page.
#[debug_handler]
async fn list_handler(
    State(app_state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let filters = Filters::new(&query.name, &query.r#type);
    let store = &app_state.store;
    store
        .apply_filters_at(filters, query.page.unwrap_or(1))
        .await;

    let type_names = store.type_names().await;
    render(
        app_state.views.list(&store.snapshot(), &type_names),
        StatusCode::OK,
    )
}

#[debug_handler]
async fn detail_handler(
    State(app_state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<u32>() else {
        tracing::debug!("Not a Pokémon id: {}", id);
        return not_found(&app_state);
    };

    let detail = app_state.store.load_item(id).await;
    let status = match detail {
        Detail::Loaded(_) => StatusCode::OK,
        Detail::NotFound(_) => StatusCode::NOT_FOUND,
        Detail::Failed(_) => StatusCode::BAD_GATEWAY,
    };

    render(
        app_state.views.detail(&app_state.store.snapshot(), &detail),
        status,
    )
}

#[debug_handler]
async fn toggle_favorite_handler(
    State(app_state): State<SharedState>,
    Path(id): Path<u32>,
    Form(form): Form<FavoriteForm>,
) -> Redirect {
    let snapshot = app_state.store.snapshot();
    // Only the id is sent to the backend.
    let item = snapshot
        .page
        .items
        .iter()
        .chain(snapshot.favorites.iter())
        .find(|p| p.id == id)
        .cloned()
        .unwrap_or_else(|| Pokemon {
            id,
            ..Default::default()
        });

    app_state.store.toggle_favorite(&item).await;
    Redirect::to(&redirect_target(form.return_to))
}

#[debug_handler]
async fn favorites_handler(State(app_state): State<SharedState>) -> Response {
    app_state.store.refresh_favorites().await;
    render(
        app_state.views.favorites(&app_state.store.snapshot()),
        StatusCode::OK,
    )
}

fn not_found(app_state: &AppState) -> Response {
    render(
        app_state.views.not_found(&app_state.store.snapshot()),
        StatusCode::NOT_FOUND,
    )
}

async fn not_found_handler(State(app_state): State<SharedState>) -> Response {
    not_found(&app_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_target_stays_on_site() {
        assert_eq!(redirect_target(Some("/pokemon/4".to_string())), "/pokemon/4");
        assert_eq!(
            redirect_target(Some("/pokemon?page=2&name=mr%20mime".to_string())),
            "/pokemon?page=2&name=mr%20mime"
        );
        assert_eq!(redirect_target(Some("//evil.example".to_string())), "/pokemon");
        assert_eq!(redirect_target(Some("/\\evil.example".to_string())), "/pokemon");
        assert_eq!(redirect_target(Some("https://evil.example".to_string())), "/pokemon");
        assert_eq!(redirect_target(Some("pokemon".to_string())), "/pokemon");
        assert_eq!(redirect_target(None), "/pokemon");
    }
}
