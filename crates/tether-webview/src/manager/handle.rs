use tether_common::WindowError;
use wry::WebView;

/// The webview hosted by a tether window. Only touched on the UI thread.
pub struct WebViewHandle {
    pub(super) webview: WebView,
    /// Last URL seen, either requested by us or reported by a page load.
    pub(super) current_url: String,
}

impl WebViewHandle {
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn navigate(&mut self, url: &str) -> Result<(), WindowError> {
        self.current_url = url.to_string();
        self.webview.load_url(url).map_err(webview_error)
    }

    /// Run a script in the render runtime. Does not wait for it to finish.
    pub fn evaluate_script(&self, js: &str) -> Result<(), WindowError> {
        self.webview.evaluate_script(js).map_err(webview_error)
    }

    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), WindowError> {
        self.webview.set_bounds(bounds).map_err(webview_error)
    }

    /// No-op unless the webview was built with devtools enabled.
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }

    pub fn set_url(&mut self, url: String) {
        self.current_url = url;
    }
}

pub(crate) fn webview_error(e: wry::Error) -> WindowError {
    WindowError::WebView(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wry_errors_become_webview_errors() {
        let err = webview_error(wry::Error::UnsupportedWindowHandle);
        assert!(matches!(err, WindowError::WebView(_)));
        assert!(err.to_string().starts_with("webview error: "));
    }
}
