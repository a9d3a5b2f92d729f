// Drives the viewer's router over HTTP, with the catalog store talking to the
// in-process mock backend.

mod common;

use common::{Backend, client, serve, spawn_backend};
use pokedex_viewer::app::{self, AppState};
use pokedex_viewer::views::Views;
use pokedex_viewer::{CatalogStore, Filters};
use reqwest::{StatusCode, header::LOCATION, redirect};
use std::sync::Arc;

struct Viewer {
    url: String,
    state: Arc<AppState>,
    backend: Arc<Backend>,
    http: reqwest::Client,
}

impl Viewer {
    async fn get(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .http
            .get(format!("{}{}", self.url, path))
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }
}

async fn spawn_viewer() -> Viewer {
    let (api_url, backend) = spawn_backend().await;
    let state = Arc::new(AppState {
        store: CatalogStore::new(client(&api_url), 20),
        views: Views::new().unwrap(),
    });
    let url = serve(app::router(state.clone())).await;
    let http = reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();

    Viewer {
        url,
        state,
        backend,
        http,
    }
}

#[tokio::test]
async fn test_list_route_loads_requested_page() {
    let viewer = spawn_viewer().await;

    let (status, body) = viewer.get("/pokemon?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h3>Mon-21</h3>"));
    assert!(!body.contains("<h3>Mon-1</h3>"));

    let snapshot = viewer.state.store.snapshot();
    assert_eq!(snapshot.page.current_page, 2);
    assert_eq!(snapshot.page.items.len(), 5);
}

#[tokio::test]
async fn test_list_route_commits_new_filters() {
    let viewer = spawn_viewer().await;

    let (status, body) = viewer.get("/pokemon?name=mon-1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"name="name" value="mon-1""#));

    let snapshot = viewer.state.store.snapshot();
    // mon-1 and mon-10 through mon-19.
    assert_eq!(snapshot.page.total_count, 11);
    assert_eq!(snapshot.page.current_page, 1);
    assert_eq!(snapshot.filters, Filters::new("mon-1", ""));
}

#[tokio::test]
async fn test_list_route_honours_page_alongside_new_filters() {
    let viewer = spawn_viewer().await;
    viewer.get("/pokemon").await;

    let (status, body) = viewer.get("/pokemon?page=2&name=mon").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h3>Mon-25</h3>"));

    let snapshot = viewer.state.store.snapshot();
    assert_eq!(snapshot.page.current_page, 2);
    assert_eq!(snapshot.page.items.len(), 5);
    assert_eq!(snapshot.filters, Filters::new("mon", ""));
    assert_eq!(
        viewer.backend.last_query.lock().unwrap().get("page").map(String::as_str),
        Some("2")
    );
}

#[tokio::test]
async fn test_failed_filter_request_keeps_previous_filters() {
    let viewer = spawn_viewer().await;
    viewer.get("/pokemon").await;
    viewer.backend.set_fail_list(true);

    let (status, body) = viewer.get("/pokemon?name=mon-2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("failed to fetch catalog"));
    assert!(body.contains(r#"name="name" value="""#));

    let snapshot = viewer.state.store.snapshot();
    assert_eq!(snapshot.filters, Filters::default());
    assert_eq!(snapshot.page.total_count, 25);
}

#[tokio::test]
async fn test_detail_route_statuses() {
    let viewer = spawn_viewer().await;

    let (status, body) = viewer.get("/pokemon/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Mon-1"));

    let (status, body) = viewer.get("/pokemon/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Pokémon not found"));

    let (status, body) = viewer.get("/pokemon/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));

    let (status, body) = viewer.get("/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
}

#[tokio::test]
async fn test_toggle_route_refuses_off_site_return() {
    let viewer = spawn_viewer().await;

    let response = viewer
        .http
        .post(format!("{}/pokemon/4/favorite", viewer.url))
        .form(&[("return_to", "/\\evil.example")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/pokemon");
    assert!(viewer.backend.favorites.lock().unwrap().contains(&4));
    assert!(viewer.state.store.is_favorite(4));

    let response = viewer
        .http
        .post(format!("{}/pokemon/4/favorite", viewer.url))
        .form(&[("return_to", "/pokemon?page=2")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()[LOCATION], "/pokemon?page=2");
    assert!(!viewer.backend.favorites.lock().unwrap().contains(&4));
}
