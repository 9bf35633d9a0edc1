//! WebView event types.

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded (DOMContentLoaded + resources).
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by the webview, drained by the UI loop.
#[derive(Debug, Clone)]
pub enum WebViewEvent {
    /// Page load state changed. Carries the URL.
    PageLoad { state: PageLoadState, url: String },
    /// Document title changed.
    TitleChanged { title: String },
    /// A bridge message arrived from the render side. `buffer` is empty
    /// unless the message was uploaded with a binary body.
    IpcMessage { body: String, buffer: Vec<u8> },
    /// An allowed navigation started.
    NavigationRequested { url: String },
    /// A navigation was refused by the allowlist.
    NavigationBlocked { url: String },
}
