use std::sync::Arc;

use catalog_types::domain::{Category, PageSize};
use tokio::{
    sync::{broadcast, watch},
    time::{sleep_until, Instant},
};
use tracing::debug;

use crate::{
    debounce::Debouncer,
    fetch::{FetchCoordinator, FetchState, QueryKey},
    pagination::PaginationWindow,
    query_state::{QueryState, SortSpec},
    settings::ClientSettings,
    shaper::ResultShaper,
    source::ProductSource,
    CatalogEvent,
};

/// One mounted product list.
///
/// Discrete selections (category, sort, page, page size, reset) refetch
/// immediately. Search text goes through the debouncer and only reaches the
/// query key once it has been quiet for the configured window; drive that with
/// [`settle`](Self::settle) or [`poll_search`](Self::poll_search). Dropping the
/// session discards whatever is still in flight.
pub struct ProductListSession {
    query: QueryState,
    search: Debouncer<String>,
    coordinator: FetchCoordinator,
    last_key: Option<QueryKey>,
}

impl ProductListSession {
    /// Builds the session and issues the fetch for `initial`.
    pub fn mount(
        source: Arc<dyn ProductSource>,
        settings: &ClientSettings,
        events: broadcast::Sender<CatalogEvent>,
        initial: QueryState,
    ) -> Self {
        let coordinator =
            FetchCoordinator::new(source, ResultShaper::new(settings.payload_mode), events);
        let mut session = Self {
            search: Debouncer::new(initial.query().to_string(), settings.debounce_window),
            query: initial,
            coordinator,
            last_key: None,
        };
        session.sync();
        session
    }

    pub fn query_state(&self) -> &QueryState {
        &self.query
    }

    /// Search text as last committed to the query key.
    pub fn debounced_query(&self) -> &str {
        self.search.settled()
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(&self.query, self.search.settled())
    }

    pub fn fetch_state(&self) -> FetchState {
        self.coordinator.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.coordinator.subscribe()
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.query.set_query(text.clone());
        self.search.input(text, Instant::now());
    }

    pub fn set_category(&mut self, category: Category) {
        self.query.set_category(category);
        self.sync();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.query.set_sort(sort);
        self.sync();
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.set_page(page);
        self.sync();
    }

    /// Changes the page size and returns to page 1.
    pub fn set_limit(&mut self, limit: PageSize) {
        self.query.set_limit(limit);
        self.sync();
    }

    /// Clears the toolbar. The cleared search text applies immediately rather
    /// than waiting out the debounce window.
    pub fn reset(&mut self) {
        self.query.reset();
        self.search.settle_now(String::new());
        self.sync();
    }

    /// Page controls for the current result. Before the first page arrives,
    /// or after a failure, this reflects an empty result.
    pub fn pagination(&self) -> PaginationWindow {
        let total = self
            .coordinator
            .state()
            .data()
            .map_or(0, |data| data.total);
        PaginationWindow::compute(total, self.query.limit().get(), self.query.page())
    }

    /// Steps forward. Without a known total (loading or failed) the step is
    /// not bounded by the last page.
    pub fn next_page(&mut self) -> bool {
        let target = match self.known_pagination() {
            Some(window) => window.next_page(),
            None => self.query.page().checked_add(1),
        };
        self.go_to(target)
    }

    pub fn previous_page(&mut self) -> bool {
        let target = match self.known_pagination() {
            Some(window) => window.previous_page(),
            None => Some(self.query.page() - 1).filter(|page| *page >= 1),
        };
        self.go_to(target)
    }

    fn known_pagination(&self) -> Option<PaginationWindow> {
        let total = self.coordinator.state().data()?.total;
        Some(PaginationWindow::compute(
            total,
            self.query.limit().get(),
            self.query.page(),
        ))
    }

    fn go_to(&mut self, target: Option<u32>) -> bool {
        match target {
            Some(page) => {
                self.set_page(page);
                true
            }
            None => false,
        }
    }

    /// Deadline of the pending search text, if any.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Commits pending search text whose window has elapsed by `now`.
    /// Returns whether a new fetch was started.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(_) => self.sync(),
            None => false,
        }
    }

    /// Waits out any pending search text and commits it.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.search.deadline() {
            sleep_until(deadline).await;
            self.poll_search(Instant::now());
        }
    }

    /// Re-issues the current key, e.g. after a failure.
    pub fn refresh(&mut self) {
        let key = self.query_key();
        self.coordinator.begin(&key);
        self.last_key = Some(key);
    }

    fn sync(&mut self) -> bool {
        let key = self.query_key();
        if self.last_key.as_ref() == Some(&key) {
            debug!("catalog: query key unchanged; keeping current fetch");
            return false;
        }
        self.coordinator.begin(&key);
        self.last_key = Some(key);
        true
    }
}

impl Drop for ProductListSession {
    fn drop(&mut self) {
        self.coordinator.invalidate();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
