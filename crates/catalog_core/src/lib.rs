use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

pub mod debounce;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod pagination;
pub mod query_state;
pub mod session;
pub mod settings;
pub mod shaper;
pub mod source;
pub mod view;

pub use detail::DetailState;
pub use error::FetchError;
pub use fetch::{FetchCoordinator, FetchState, QueryKey};
pub use pagination::{PageButton, PaginationWindow};
pub use query_state::{QueryState, SortSpec};
pub use session::ProductListSession;
pub use settings::ClientSettings;
pub use shaper::{ResultShaper, ShapeMode};
pub use source::{HttpProductSource, ProductSource};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Transient, user-facing message raised when a fetch fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    Notification(Notification),
    StaleResultDiscarded { generation: u64 },
}

/// Entry point for consumers: owns the product source and the event channel,
/// and opens list sessions and detail lookups against them.
pub struct CatalogClient {
    settings: ClientSettings,
    source: Arc<dyn ProductSource>,
    events: broadcast::Sender<CatalogEvent>,
}

impl CatalogClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let source = HttpProductSource::new(&settings.server_url, settings.request_timeout)?;
        Ok(Self::with_source(settings, Arc::new(source)))
    }

    pub fn with_source(settings: ClientSettings, source: Arc<dyn ProductSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            settings,
            source,
            events,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Mounts a list session with default toolbar state and starts its first fetch.
    pub fn open_list(&self) -> ProductListSession {
        self.open_list_with(QueryState::new(self.settings.default_page_size))
    }

    pub fn open_list_with(&self, initial: QueryState) -> ProductListSession {
        ProductListSession::mount(
            Arc::clone(&self.source),
            &self.settings,
            self.events.clone(),
            initial,
        )
    }

    pub async fn product_detail(&self, id: &str) -> DetailState {
        detail::load_product_detail(
            self.source.as_ref(),
            ResultShaper::new(self.settings.payload_mode),
            &self.events,
            id,
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
