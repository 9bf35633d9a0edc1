//! Window creation, bridge wiring, and webview setup.

use std::sync::Arc;

use tether_bridge::{Bridge, MessageCallback};
use tether_common::Event;
use tether_webview::content::INDEX_DOCUMENT;
use tether_webview::{ContentProvider, ProxyQueue, WebViewConfig, WebViewWindow};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use crate::commands;

use super::core::TetherApp;
use super::types::DEMO_PAGE;

impl TetherApp {
    /// Create the window, its bridge, and the webview.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let Some(proxy) = self.proxy.clone() else {
            tracing::error!("No event loop proxy; cannot build the window facade");
            return false;
        };

        let wc = &self.config.window;
        let mut attrs = WindowAttributes::default()
            .with_title(wc.title.clone())
            .with_inner_size(LogicalSize::new(wc.width as f64, wc.height as f64))
            .with_resizable(wc.resizable)
            .with_transparent(wc.transparent);
        if wc.min_width > 0 || wc.min_height > 0 {
            attrs = attrs.with_min_inner_size(LogicalSize::new(
                wc.min_width as f64,
                wc.min_height as f64,
            ));
        }

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        // Host-directed messages fan out on the event bus.
        let bus = self.event_bus.clone();
        let on_message: MessageCallback = Arc::new(move |message: &str| {
            bus.publish(Event::HostMessage(message.to_string()));
        });
        let facade: Arc<dyn tether_bridge::Window> =
            Arc::new(WebViewWindow::new(ProxyQueue::new(proxy), on_message));
        commands::register_window(&self.handlers, Arc::clone(&facade));
        let bridge = Bridge::new(Arc::clone(&self.handlers), facade);

        self.webviews.set_content_provider(self.content_provider());

        let config = WebViewConfig {
            url: wc.url.clone(),
            devtools: wc.devtools,
            transparent: wc.transparent,
            user_agent: wc.user_agent.clone().or(WebViewConfig::default().user_agent),
            ..Default::default()
        };
        let bounds = full_window_bounds(&window);
        let handle = match self
            .webviews
            .create(&*window, bounds, config, Arc::clone(bridge.posts()))
        {
            Ok(h) => h,
            Err(e) => {
                tracing::error!("Failed to create webview: {e}");
                return false;
            }
        };

        tracing::info!(
            url = %handle.current_url(),
            commands = ?self.handlers.names(),
            "Window created and bridge ready"
        );
        self.webview = Some(handle);
        self.bridge = Some(bridge);
        self.window = Some(window);
        true
    }

    fn content_provider(&self) -> ContentProvider {
        match &self.config.window.assets_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    tracing::warn!(
                        path = %dir.display(),
                        "Assets directory not found; tether:// will serve nothing"
                    );
                }
                ContentProvider::new(dir)
            }
            None => {
                let mut provider = ContentProvider::in_memory();
                provider.add_override(INDEX_DOCUMENT, "text/html", DEMO_PAGE.as_bytes());
                provider
            }
        }
    }

    /// Stretch the webview over the window's whole client area.
    pub(super) fn sync_webview_bounds(&self) {
        if let (Some(window), Some(webview)) = (&self.window, &self.webview) {
            if let Err(e) = webview.set_bounds(full_window_bounds(window)) {
                tracing::warn!("Failed to resize webview: {e}");
            }
        }
    }

    /// Let the render side know the window is up.
    pub(super) fn announce_ready(&self) {
        if let Some(bridge) = &self.bridge {
            bridge.emit("tether:ready", &self.config.window.title);
        }
    }
}

fn full_window_bounds(window: &winit::window::Window) -> wry::Rect {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(size.width, size.height)),
    }
}
