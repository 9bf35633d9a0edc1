/// How the webview is built. Filled from `[window]` by the app.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// First page loaded.
    pub url: String,
    pub transparent: bool,
    pub devtools: bool,
    /// Falls back to the platform's own user agent when `None`.
    pub user_agent: Option<String>,
    pub clipboard: bool,
    pub autoplay: bool,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            url: "tether://localhost/".to_string(),
            transparent: false,
            devtools: cfg!(debug_assertions),
            user_agent: Some(format!("Tether/{}", env!("CARGO_PKG_VERSION"))),
            clipboard: true,
            autoplay: true,
        }
    }
}
