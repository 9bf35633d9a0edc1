//! Constants shared across the event loop.

use std::time::Duration;

/// How often the loop wakes to drain webview events when otherwise idle.
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// How often unfetched posts are checked against `bridge.post_ttl_secs`.
pub(super) const EXPIRY_INTERVAL: Duration = Duration::from_secs(1);

/// Page served at `tether://localhost/` when no assets directory is set.
pub(super) const DEMO_PAGE: &str = include_str!("demo.html");
