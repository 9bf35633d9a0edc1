use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{PageLoadState, WebViewEvent};

use super::WebViewManager;

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// URL prefixes a webview may navigate to when none are configured.
///
/// - `tether://` serves bundled assets and posts
/// - `http://tether.localhost` is the same origin as rewritten by WebView2
/// - `about:blank` is the default empty page
pub const DEFAULT_ALLOWED_NAVIGATION: &[&str] =
    &["tether://", "http://tether.localhost", "about:blank"];

/// Check whether `url` starts with one of the allowed prefixes.
pub fn is_navigation_allowed<S: AsRef<str>>(allowed: &[S], url: &str) -> bool {
    allowed
        .iter()
        .any(|prefix| !prefix.as_ref().is_empty() && url.starts_with(prefix.as_ref()))
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewManager {
    /// Messages posted through `window.ipc.postMessage`. These never carry a
    /// buffer; binary uploads arrive through the protocol handler instead.
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();
            if body.trim().is_empty() {
                warn!("IPC message rejected: empty body");
                return;
            }

            debug!(body_len = body.len(), "IPC message from render");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::IpcMessage {
                    body,
                    buffer: Vec::new(),
                });
            }
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(?state, url = %url, "page load");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::PageLoad { state, url });
            }
        })
    }

    pub(super) fn attach_title_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_document_title_changed_handler(move |title| {
            debug!(title = %title, "title changed");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::TitleChanged { title });
            }
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        allowed: Arc<Vec<String>>,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            let allow = is_navigation_allowed(allowed.as_slice(), &url);
            if allow {
                debug!(url = %url, "navigation allowed");
            } else {
                warn!(url = %url, "navigation blocked: URL not in allowlist");
            }
            if let Ok(mut evts) = events.lock() {
                evts.push(if allow {
                    WebViewEvent::NavigationRequested { url }
                } else {
                    WebViewEvent::NavigationBlocked { url }
                });
            }
            allow
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(url: &str) -> bool {
        is_navigation_allowed(DEFAULT_ALLOWED_NAVIGATION, url)
    }

    #[test]
    fn allows_tether_protocol() {
        assert!(allowed("tether://localhost/index.html"));
        assert!(allowed("tether://localhost/post/abc"));
    }

    #[test]
    fn allows_webview2_rewritten_protocol() {
        assert!(allowed("http://tether.localhost/index.html"));
    }

    #[test]
    fn allows_about_blank() {
        assert!(allowed("about:blank"));
    }

    #[test]
    fn blocks_everything_else_by_default() {
        assert!(!allowed("https://example.com"));
        assert!(!allowed("http://localhost:8080"));
        assert!(!allowed("file:///etc/passwd"));
        assert!(!allowed("javascript:alert(1)"));
        assert!(!allowed("data:text/html,<h1>x</h1>"));
        assert!(!allowed(""));
    }

    #[test]
    fn configured_prefixes_extend_the_list() {
        let list = vec![
            "tether://".to_string(),
            "https://docs.example.org/".to_string(),
        ];
        assert!(is_navigation_allowed(list.as_slice(), "https://docs.example.org/guide"));
        assert!(!is_navigation_allowed(list.as_slice(), "https://docs.example.org.evil.net/"));
    }

    #[test]
    fn empty_prefix_allows_nothing() {
        let list = vec![String::new()];
        assert!(!is_navigation_allowed(list.as_slice(), "https://example.com"));
    }
}
