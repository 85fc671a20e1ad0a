use catalog_types::domain::ProductId;
use thiserror::Error;

/// Failure of a single list or detail fetch. Every variant is non-fatal: it
/// is recorded in the view state and surfaced as a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("Network response was not ok ({status})")]
    Http { status: u16 },
    #[error("Product not found (404)")]
    NotFound { id: ProductId },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid catalog endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("No product id provided")]
    MissingProductId,
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status } => Some(*status),
            FetchError::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}
