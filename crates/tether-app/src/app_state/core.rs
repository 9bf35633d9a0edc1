//! TetherApp struct definition and constructor.

use std::sync::Arc;
use std::time::Instant;

use tether_bridge::{Bridge, HandlerRegistry};
use tether_common::EventBus;
use tether_config::TetherConfig;
use tether_webview::{UiCommand, WebViewHandle, WebViewManager};
use tokio::runtime::Runtime;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use crate::commands;

/// Top-level application state.
pub struct TetherApp {
    pub(super) config: TetherConfig,
    pub(super) event_bus: EventBus,
    /// Command table shared by the window's bridge.
    pub(super) handlers: Arc<HandlerRegistry>,
    pub(super) tokio_runtime: Option<Runtime>,
    pub(super) proxy: Option<EventLoopProxy<UiCommand>>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,
    pub(super) webviews: WebViewManager,
    pub(super) webview: Option<WebViewHandle>,
    pub(super) bridge: Option<Bridge>,

    pub(super) should_exit: bool,
    pub(super) exit_code: i32,
    pub(super) last_poll: Instant,
    pub(super) last_expiry: Instant,
}

impl TetherApp {
    pub fn new(config: TetherConfig, runtime: Runtime, event_bus: EventBus) -> Self {
        let handlers = Arc::new(HandlerRegistry::new());
        commands::register_core(&handlers, runtime.handle().clone());

        let mut webviews = WebViewManager::new();
        webviews.set_allowed_navigation(config.bridge.allowed_navigation.clone());

        Self {
            config,
            event_bus,
            handlers,
            tokio_runtime: Some(runtime),
            proxy: None,
            window: None,
            webviews,
            webview: None,
            bridge: None,
            should_exit: false,
            exit_code: 0,
            last_poll: Instant::now(),
            last_expiry: Instant::now(),
        }
    }

    /// Attach the proxy the window facade uses to reach the UI thread.
    pub fn with_proxy(mut self, proxy: EventLoopProxy<UiCommand>) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Code passed to the last `close`/`exit`, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Mark the app for exit with `code`; the loop stops on its next turn.
    pub(super) fn request_exit(&mut self, code: i32) {
        self.exit_code = code;
        self.should_exit = true;
    }
}
