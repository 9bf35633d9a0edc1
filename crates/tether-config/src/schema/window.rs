//! Window configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The native window and the webview it hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial logical size in pixels (valid range: 100-16384).
    pub width: u32,
    pub height: u32,
    /// Minimum logical size; 0 means unconstrained.
    pub min_width: u32,
    pub min_height: u32,
    pub resizable: bool,
    /// First page loaded by the webview.
    pub url: String,
    /// Directory served under `tether://localhost/`. When unset, a built-in
    /// demo page is served instead.
    pub assets_dir: Option<PathBuf>,
    pub devtools: bool,
    pub transparent: bool,
    /// Overrides the webview's default user agent.
    pub user_agent: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tether".into(),
            width: 800,
            height: 600,
            min_width: 0,
            min_height: 0,
            resizable: true,
            url: "tether://localhost/".into(),
            assets_dir: None,
            devtools: cfg!(debug_assertions),
            transparent: false,
            user_agent: None,
        }
    }
}
