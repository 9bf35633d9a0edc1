//! Native window side of the tether bridge.
//!
//! Wraps the `wry` crate to provide:
//! - A webview per window with the render runtime preinstalled
//! - The `tether://` protocol for bundled assets, stored posts and binary uploads
//! - A [`tether_bridge::Window`] facade that queues work onto the UI thread
//! - Event handling (page load, title change, navigation)

pub mod content;
pub mod events;
pub mod manager;
pub mod protocol;
pub mod window;

pub use content::ContentProvider;
pub use events::{PageLoadState, WebViewEvent};
pub use manager::{WebViewConfig, WebViewHandle, WebViewManager};
pub use protocol::{ProtocolHandler, ProtocolResponse, SCHEME};
pub use window::{ProxyQueue, UiCommand, UiQueue, WebViewWindow};
