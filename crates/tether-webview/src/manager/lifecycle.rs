use std::sync::Arc;

use tether_bridge::script::INIT_SCRIPT;
use tether_bridge::PostStore;
use tether_common::WindowError;
use tracing::debug;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::content::ContentProvider;
use crate::protocol::{ProtocolHandler, SCHEME};

use super::handle::{webview_error, WebViewHandle};
use super::types::WebViewConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create the webview as a child of `window`, positioned at `bounds`.
    ///
    /// The render runtime is installed before any page script runs, and
    /// `posts` backs the `post/<id>` route of the `tether://` protocol.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
        posts: Arc<PostStore>,
    ) -> Result<WebViewHandle, WindowError> {
        let events = Arc::clone(&self.events);

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_clipboard(config.clipboard)
            .with_autoplay(config.autoplay)
            .with_initialization_script(INIT_SCRIPT);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, Arc::clone(&events));
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events));
        builder = Self::attach_title_handler(builder, Arc::clone(&events));
        builder = Self::attach_navigation_handler(
            builder,
            Arc::clone(&events),
            Arc::clone(&self.allowed_navigation),
        );
        builder = self.attach_custom_protocol(builder, posts);

        let webview = builder
            .with_url(&config.url)
            .build_as_child(window)
            .map_err(webview_error)?;

        debug!(url = %config.url, "WebView created");

        Ok(WebViewHandle {
            webview,
            current_url: config.url,
        })
    }

    /// Set the provider for bundled assets served via `tether://`.
    pub fn set_content_provider(&mut self, provider: ContentProvider) {
        self.content_provider = Some(Arc::new(provider));
    }

    fn attach_custom_protocol<'a>(
        &self,
        builder: WebViewBuilder<'a>,
        posts: Arc<PostStore>,
    ) -> WebViewBuilder<'a> {
        let handler = ProtocolHandler::new(
            posts,
            self.content_provider.clone(),
            Arc::clone(&self.events),
        );
        builder.with_custom_protocol(SCHEME.to_string(), move |_wv_id, request| {
            let method = request.method().as_str().to_string();
            let uri = request.uri().to_string();
            handler
                .handle(&method, &uri, request.into_body())
                .into_http()
        })
    }
}
