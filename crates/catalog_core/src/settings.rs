use std::time::Duration;

use catalog_types::domain::PageSize;

use crate::shaper::ShapeMode;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub server_url: String,
    pub default_page_size: PageSize,
    /// Quiescence window applied to search text before it reaches the query key.
    pub debounce_window: Duration,
    /// `None` leaves a hung request loading indefinitely.
    pub request_timeout: Option<Duration>,
    pub payload_mode: ShapeMode,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            default_page_size: PageSize::default(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            request_timeout: None,
            payload_mode: ShapeMode::default(),
        }
    }
}
