use catalog_types::{domain::ProductId, protocol::Product};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    error::FetchError, shaper::ResultShaper, source::ProductSource, CatalogEvent, Notification,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Loading,
    Ready(Product),
    Failed(FetchError),
}

impl DetailState {
    pub fn product(&self) -> Option<&Product> {
        match self {
            DetailState::Ready(product) => Some(product),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            DetailState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Fetches one product. Failures are announced on `events` and returned as
/// [`DetailState::Failed`]; they never propagate.
pub async fn load_product_detail(
    source: &dyn ProductSource,
    shaper: ResultShaper,
    events: &broadcast::Sender<CatalogEvent>,
    id: &str,
) -> DetailState {
    match fetch_product(source, shaper, id).await {
        Ok(product) => {
            info!(product_id = %product.id, "catalog: product detail ready");
            DetailState::Ready(product)
        }
        Err(error) => {
            let message = failure_message(&error);
            warn!(product_id = id, %error, "catalog: product detail fetch failed");
            let _ = events.send(CatalogEvent::Notification(Notification::error(message)));
            DetailState::Failed(error)
        }
    }
}

async fn fetch_product(
    source: &dyn ProductSource,
    shaper: ResultShaper,
    id: &str,
) -> Result<Product, FetchError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(FetchError::MissingProductId);
    }
    let record = source.product(&ProductId::new(id)).await?;
    shaper.shape_product(&record)
}

fn failure_message(error: &FetchError) -> String {
    match error {
        FetchError::Http { status } => format!("Failed to fetch product ({status})"),
        other => other.to_string(),
    }
}
