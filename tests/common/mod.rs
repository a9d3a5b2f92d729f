// In-process mock of the catalog backend shared by the integration tests.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use pokedex_viewer::{CatalogConfig, HttpCatalogClient};
use serde_json::{Value, json};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const TOTAL: u32 = 25;

#[derive(Default)]
pub struct Backend {
    pub favorites: Mutex<BTreeSet<u32>>,
    pub last_query: Mutex<HashMap<String, String>>,
    pub fail_list: AtomicBool,
}

impl Backend {
    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }
}

pub fn item_json(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("mon-{}", id),
        "height": 7,
        "weight": 69,
        "types": [{"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/grass"}}],
        "abilities": [{"ability": {"name": "overgrow"}, "is_hidden": false, "slot": 1}],
        "stats": [{"base_stat": 45, "effort": 0, "stat": {"name": "hp"}}],
        "sprites": {
            "front_default": format!("https://img/{}.png", id),
            "back_default": null,
            "front_shiny": null,
            "back_shiny": null,
            "other": {"official-artwork": {"front_default": null}}
        },
        "is_favorite": false
    })
}

/// Paginates like the real backend: 20 per page, `name` is a substring
/// match, every item is grass-typed, and pages past the end are a 404.
async fn list(
    State(backend): State<Arc<Backend>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if backend.fail_list.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let name = query.get("name").cloned().unwrap_or_default();
    let type_matches = query.get("type").is_none_or(|t| t == "grass");
    *backend.last_query.lock().unwrap() = query;

    let matching: Vec<u32> = (1..=TOTAL)
        .filter(|id| type_matches && format!("mon-{}", id).contains(&name))
        .collect();

    let start = ((page - 1) * 20) as usize;
    if page > 1 && start >= matching.len() {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Invalid page."}))).into_response();
    }
    let results: Vec<Value> = matching.iter().skip(start).take(20).copied().map(item_json).collect();
    Json(json!({"count": matching.len(), "next": null, "previous": null, "results": results}))
        .into_response()
}

async fn detail(Path(id): Path<u32>) -> Response {
    match id {
        9999 => (StatusCode::NOT_FOUND, Json(json!({"error": "Pokémon not found"}))).into_response(),
        500 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        777 => Json(json!({"id": "not-a-number"})).into_response(),
        id => Json(item_json(id)).into_response(),
    }
}

async fn types() -> Json<Value> {
    Json(json!({"types": ["fire", "grass", "water"]}))
}

async fn toggle(State(backend): State<Arc<Backend>>, Path(id): Path<u32>) -> Response {
    if id > TOTAL {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Pokémon not found"}))).into_response();
    }
    let mut favorites = backend.favorites.lock().unwrap();
    let is_favorite = if favorites.remove(&id) {
        false
    } else {
        favorites.insert(id);
        true
    };
    Json(json!({"id": id, "name": format!("mon-{}", id), "is_favorite": is_favorite})).into_response()
}

async fn favorites(State(backend): State<Arc<Backend>>) -> Json<Value> {
    let favorites = backend.favorites.lock().unwrap();
    let results: Vec<Value> = favorites.iter().copied().map(item_json).collect();
    Json(json!({"count": results.len(), "next": null, "previous": null, "results": results}))
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/pokemon/", get(list))
        .route("/api/pokemon/types/", get(types))
        .route("/api/pokemon/favorites/", get(favorites))
        .route("/api/pokemon/{id}/", get(detail))
        .route("/api/pokemon/{id}/favorite/", post(toggle))
        .with_state(backend.clone());

    (format!("{}/api", serve(app).await), backend)
}

pub fn client(api_url: &str) -> HttpCatalogClient {
    HttpCatalogClient::new(&CatalogConfig {
        api_url: api_url.to_string(),
        timeout: 5,
        page_size: 20,
    })
    .unwrap()
}
