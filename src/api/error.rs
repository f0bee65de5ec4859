use serde::{Deserialize, Serialize};

/// Failures talking to the upstream Steam services.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Access Denied. Check your Steam API Key.")]
    AccessDenied,

    #[error("Bad Request. Check your Steam ID (it should be a 64-bit ID).")]
    BadRequest,

    #[error("HTTP Error: {0}")]
    Http(u16),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Invalid response from Steam API: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    /// Maps a non-success HTTP status code.
    pub fn from_status(code: u16) -> Self {
        match code {
            401 | 403 => CatalogError::AccessDenied,
            400 => CatalogError::BadRequest,
            code => CatalogError::Http(code),
        }
    }
}

// Request urls carry the API key, so they are stripped from messages.
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if let Some(code) = err.status() {
            return CatalogError::from_status(code.as_u16());
        }
        if err.is_decode() {
            return CatalogError::InvalidResponse(err.to_string());
        }
        CatalogError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::InvalidResponse(err.to_string())
    }
}
