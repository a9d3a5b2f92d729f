use pokedex_viewer::app::{self, AppState, SharedState};
use pokedex_viewer::views::Views;
use pokedex_viewer::{CatalogError, CatalogStore, Config, DEFAULT_CONFIG, HttpCatalogClient};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a config file that replaces the built-in one.
const CONFIG_ENV: &str = "POKEDEX_CONFIG";

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    ClientError(CatalogError),
    TemplateError(String),
    IoError(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ClientError(err) => write!(f, "Catalog client error: {}", err),
            AppError::TemplateError(msg) => write!(f, "Template error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::ClientError(err)
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::TemplateError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

fn load_config() -> Result<Config, AppError> {
    let source = match std::env::var(CONFIG_ENV) {
        Ok(path) => std::fs::read_to_string(&path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read {}: {}", path, e))
        })?,
        Err(_) => DEFAULT_CONFIG.to_string(),
    };

    Ok(Config::from_toml_str(&source)?)
}

fn init_tracing(json: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn run(config: Config) -> Result<(), AppError> {
    let client = HttpCatalogClient::new(&config.catalog)?;
    let store = CatalogStore::new(client, config.catalog.page_size);
    let views = Views::new()?;

    // First page and favorites are loaded up front; failures are already logged
    // and recorded by the store, so the viewer starts regardless.
    store.load_page(1).await;
    store.refresh_favorites().await;

    let app_state: SharedState = Arc::new(AppState { store, views });

    let app = app::router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(|e| {
            tracing::error!("Failed to bind to address {}: {}", config.server.bind_address, e);
            AppError::from(e)
        })?;

    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = load_config();
    init_tracing(config.as_ref().is_ok_and(|c| c.log.json));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::debug!("Using catalog backend at {}", config.catalog.api_url);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
