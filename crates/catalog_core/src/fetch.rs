//! Query-keyed product page fetching.
//!
//! Every key change bumps a generation counter, publishes `Loading` and spawns
//! the request. The spawned task commits only if its generation is still the
//! current one; the counter lock is held across the check and the publish so a
//! newer key can never be overwritten by an older response. Superseded
//! requests are left to finish on their own.

use std::sync::Arc;

use catalog_types::{
    domain::{Category, PageSize, SortKey},
    protocol::{ListResponse, RequestDescriptor},
};
use parking_lot::Mutex;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    error::FetchError, query_state::QueryState, shaper::ResultShaper, source::ProductSource,
    CatalogEvent, Notification,
};

/// Fields whose change triggers a new fetch. `query` is the debounced text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    pub query: String,
    pub category: Category,
    pub sort_key: SortKey,
    pub page: u32,
    pub limit: PageSize,
}

impl QueryKey {
    pub fn new(state: &QueryState, debounced_query: &str) -> Self {
        Self {
            query: debounced_query.to_string(),
            category: state.category(),
            sort_key: state.sort().key,
            page: state.page(),
            limit: state.limit(),
        }
    }

    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor {
            query: (!self.query.is_empty()).then(|| self.query.clone()),
            category: self.category.is_filter().then_some(self.category),
            page: self.page,
            limit: self.limit.get(),
            sort_key: Some(self.sort_key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Loading,
    Ready(ListResponse),
    Failed(FetchError),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&ListResponse> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

pub struct FetchCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    source: Arc<dyn ProductSource>,
    shaper: ResultShaper,
    generation: Mutex<u64>,
    state: watch::Sender<FetchState>,
    events: broadcast::Sender<CatalogEvent>,
}

impl FetchCoordinator {
    pub fn new(
        source: Arc<dyn ProductSource>,
        shaper: ResultShaper,
        events: broadcast::Sender<CatalogEvent>,
    ) -> Self {
        let (state, _) = watch::channel(FetchState::Loading);
        Self {
            inner: Arc::new(CoordinatorInner {
                source,
                shaper,
                generation: Mutex::new(0),
                state,
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> FetchState {
        self.inner.state.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        *self.inner.generation.lock()
    }

    /// Starts a fetch for `key`, superseding any fetch still in flight.
    /// Must be called from within a tokio runtime.
    pub fn begin(&self, key: &QueryKey) -> JoinHandle<()> {
        let request = key.descriptor();
        let generation = {
            let mut current = self.inner.generation.lock();
            *current += 1;
            self.inner.state.send_replace(FetchState::Loading);
            *current
        };
        debug!(generation, ?request, "catalog: query key changed");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.load(&request).await;
            inner.commit(generation, outcome);
        })
    }

    /// Marks every in-flight fetch as stale without starting a new one.
    pub fn invalidate(&self) {
        *self.inner.generation.lock() += 1;
    }
}

impl CoordinatorInner {
    async fn load(&self, request: &RequestDescriptor) -> Result<ListResponse, FetchError> {
        let payload = self.source.list_products(request).await?;
        let items = self
            .shaper
            .shape_items(payload.items.as_deref().unwrap_or(&[]))?;
        Ok(ListResponse {
            page: payload.page.filter(|page| *page >= 1).unwrap_or(request.page),
            limit: payload
                .limit
                .filter(|limit| *limit > 0)
                .unwrap_or(request.limit),
            total: payload.total.unwrap_or(items.len() as u64),
            items,
        })
    }

    fn commit(&self, generation: u64, outcome: Result<ListResponse, FetchError>) {
        let current = self.generation.lock();
        if *current != generation {
            debug!(
                generation,
                current = *current,
                "catalog: discarding stale product page"
            );
            let _ = self
                .events
                .send(CatalogEvent::StaleResultDiscarded { generation });
            return;
        }

        match outcome {
            Ok(data) => {
                info!(
                    generation,
                    page = data.page,
                    items = data.items.len(),
                    total = data.total,
                    "catalog: product page ready"
                );
                self.state.send_replace(FetchState::Ready(data));
            }
            Err(error) => {
                warn!(generation, %error, "catalog: product page fetch failed");
                let _ = self.events.send(CatalogEvent::Notification(Notification::error(
                    error.to_string(),
                )));
                self.state.send_replace(FetchState::Failed(error));
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
