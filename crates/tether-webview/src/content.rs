//! Bundled application assets served over the `tether://` protocol.
//!
//! Lets the render side load its HTML/JS/CSS without a local HTTP server.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Document served when the request path is empty.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Serves files from a base directory, with optional in-memory overrides.
///
/// A request for `tether://localhost/app/main.js` resolves to
/// `{base_dir}/app/main.js`. Paths escaping `base_dir` never resolve.
pub struct ContentProvider {
    base_dir: PathBuf,
    overrides: HashMap<String, (String, Vec<u8>)>, // path -> (mime, data)
}

impl ContentProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// A provider with no backing directory; only overrides resolve.
    pub fn in_memory() -> Self {
        Self::new(PathBuf::new())
    }

    /// Register an in-memory asset that shadows any file at `path`.
    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.overrides
            .insert(path.into(), (mime.into(), data.into()));
    }

    /// Resolve a request path to its MIME type and bytes.
    pub fn resolve(&self, path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let clean = match path.trim_start_matches('/') {
            "" => INDEX_DOCUMENT,
            p => p,
        };

        if let Some((mime, data)) = self.overrides.get(clean) {
            return Some((Cow::Borrowed(mime.as_str()), Cow::Borrowed(data.as_slice())));
        }

        let file_path = self.base_dir.join(clean);

        // Canonicalize both sides so `..` and symlinks can't leave the base.
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) {
            debug!(path = %clean, "asset outside base directory");
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        let mime = mime_from_extension(&file_path);
        Some((Cow::Borrowed(mime), Cow::Owned(data)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Guess MIME type from file extension.
pub fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
