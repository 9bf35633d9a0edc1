//! WebView lifecycle management.
//!
//! `WebViewManager` builds the single `wry::WebView` hosted by a tether
//! window and collects the events it raises for the UI loop.

use std::sync::{Arc, Mutex};

use crate::content::ContentProvider;
use crate::events::WebViewEvent;

mod handle;
pub mod handlers;
mod lifecycle;
mod types;

pub use handle::WebViewHandle;
pub use handlers::{is_navigation_allowed, DEFAULT_ALLOWED_NAVIGATION};
pub use types::WebViewConfig;

pub struct WebViewManager {
    /// Event sink. Handlers push here; the UI loop drains.
    pub(crate) events: Arc<Mutex<Vec<WebViewEvent>>>,
    /// Assets for the `tether://` protocol.
    content_provider: Option<Arc<ContentProvider>>,
    allowed_navigation: Arc<Vec<String>>,
}

impl WebViewManager {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            content_provider: None,
            allowed_navigation: Arc::new(
                DEFAULT_ALLOWED_NAVIGATION.iter().map(|s| s.to_string()).collect(),
            ),
        }
    }

    /// Replace the navigation allowlist. Applies to webviews created afterwards.
    pub fn set_allowed_navigation(&mut self, prefixes: Vec<String>) {
        self.allowed_navigation = Arc::new(prefixes);
    }

    pub fn allowed_navigation(&self) -> &[String] {
        &self.allowed_navigation
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Default for WebViewManager {
    fn default() -> Self {
        Self::new()
    }
}
