//! The `tether://` custom protocol.
//!
//! Three kinds of request share the scheme:
//!
//! - `GET  tether://localhost/post/<id>` hands out a stored post once.
//! - `POST tether://localhost/ipc?<message>` carries a bridge message whose
//!   binary payload is the request body.
//! - anything else is a bundled asset from the [`ContentProvider`].
//!
//! WebView2 rewrites custom schemes to `http://tether.localhost/...`; both
//! spellings are accepted.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use tether_bridge::PostStore;
use tracing::{debug, warn};

use crate::content::ContentProvider;
use crate::events::WebViewEvent;

/// Scheme name registered with the webview.
pub const SCHEME: &str = "tether";

const ORIGIN_PREFIXES: &[&str] = &[
    "tether://localhost/",
    "tether://localhost",
    "http://tether.localhost/",
    "http://tether.localhost",
    "tether:///",
    "tether://",
];

/// A protocol response before it is turned into a `wry::http::Response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolResponse {
    pub status: u16,
    pub mime: Cow<'static, str>,
    pub body: Vec<u8>,
}

impl ProtocolResponse {
    fn new(status: u16, mime: impl Into<Cow<'static, str>>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            mime: mime.into(),
            body: body.into(),
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self::new(status, "text/plain", body.as_bytes())
    }

    pub fn into_http(self) -> wry::http::Response<Cow<'static, [u8]>> {
        let status = self.status;
        wry::http::Response::builder()
            .status(status)
            .header("Content-Type", self.mime.as_ref())
            .header("Access-Control-Allow-Origin", "*")
            .body(Cow::Owned(self.body))
            .unwrap_or_else(|e| {
                warn!(status, error = %e, "failed to build protocol response");
                wry::http::Response::new(Cow::Borrowed(&[][..]))
            })
    }
}

/// Answers `tether://` requests for one webview.
#[derive(Clone)]
pub struct ProtocolHandler {
    posts: Arc<PostStore>,
    content: Option<Arc<ContentProvider>>,
    events: Arc<Mutex<Vec<WebViewEvent>>>,
}

impl ProtocolHandler {
    pub fn new(
        posts: Arc<PostStore>,
        content: Option<Arc<ContentProvider>>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> Self {
        Self {
            posts,
            content,
            events,
        }
    }

    pub fn handle(&self, method: &str, uri: &str, body: Vec<u8>) -> ProtocolResponse {
        let rest = strip_origin(uri);
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        if let Some(id) = path.strip_prefix("post/") {
            return self.take_post(method, id);
        }
        if path == "ipc" {
            return self.upload(method, query, body);
        }
        self.asset(path)
    }

    fn take_post(&self, method: &str, id: &str) -> ProtocolResponse {
        if method != "GET" {
            return ProtocolResponse::text(405, "Method Not Allowed");
        }
        match self.posts.take(id) {
            Some(bytes) => {
                debug!(post_id = %id, len = bytes.len(), "post fetched");
                ProtocolResponse::new(200, "application/octet-stream", bytes)
            }
            None => {
                warn!(post_id = %id, "post not found or already fetched");
                ProtocolResponse::text(404, "Not Found")
            }
        }
    }

    fn upload(&self, method: &str, query: &str, body: Vec<u8>) -> ProtocolResponse {
        if method != "POST" {
            return ProtocolResponse::text(405, "Method Not Allowed");
        }
        let message = match urlencoding::decode(query) {
            Ok(message) => message.into_owned(),
            Err(e) => {
                warn!(error = %e, "ipc upload rejected: message is not utf-8");
                return ProtocolResponse::text(400, "Bad Request");
            }
        };
        if message.trim().is_empty() {
            warn!("ipc upload rejected: empty message");
            return ProtocolResponse::text(400, "Bad Request");
        }

        debug!(body_len = message.len(), buffer_len = body.len(), "ipc upload");
        if let Ok(mut evts) = self.events.lock() {
            evts.push(WebViewEvent::IpcMessage {
                body: message,
                buffer: body,
            });
        }
        ProtocolResponse::text(202, "Accepted")
    }

    fn asset(&self, path: &str) -> ProtocolResponse {
        let resolved = self
            .content
            .as_ref()
            .and_then(|cp| cp.resolve(path).map(|(m, d)| (m.into_owned(), d.into_owned())));
        match resolved {
            Some((mime, data)) => ProtocolResponse::new(200, mime, data),
            None => {
                warn!(path = %path, "custom protocol: asset not found");
                ProtocolResponse::text(404, "Not Found")
            }
        }
    }
}

fn strip_origin(uri: &str) -> &str {
    ORIGIN_PREFIXES
        .iter()
        .find_map(|prefix| uri.strip_prefix(prefix))
        .unwrap_or("")
}
