// Errors raised by the remote catalog client and the state store.

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    NetworkError(String),
    NotFound(u32),
    DeserializationError(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            CatalogError::NotFound(id) => write!(f, "Pokémon {} not found", id),
            CatalogError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::DeserializationError(err.to_string())
        } else {
            CatalogError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::DeserializationError(err.to_string())
    }
}

/// What the store reports to views. One message per operation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    CatalogFetch,
    DetailsFetch,
}

impl StoreError {
    pub fn message(&self) -> &'static str {
        match self {
            StoreError::CatalogFetch => "failed to fetch catalog",
            StoreError::DetailsFetch => "failed to fetch details",
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for StoreError {}
