//! Draining webview events into the bridge, and post expiry.

use std::time::{Duration, Instant};

use tether_webview::{PageLoadState, WebViewEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use super::core::TetherApp;
use super::types::{EXPIRY_INTERVAL, POLL_INTERVAL};

impl TetherApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_webview_events();
        }

        if now.duration_since(self.last_expiry) >= EXPIRY_INTERVAL {
            self.last_expiry = now;
            self.expire_posts();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// Route render messages through the bridge and track page state.
    fn poll_webview_events(&mut self) {
        for event in self.webviews.drain_events() {
            match event {
                WebViewEvent::IpcMessage { body, buffer } => {
                    if let Some(bridge) = &self.bridge {
                        bridge.route(&body, &buffer);
                    }
                }
                WebViewEvent::PageLoad { state, url } => {
                    tracing::debug!(?state, url = %url, "page load");
                    if let Some(webview) = &mut self.webview {
                        webview.set_url(url);
                    }
                    if state == PageLoadState::Finished {
                        self.announce_ready();
                    }
                }
                WebViewEvent::TitleChanged { title } => {
                    tracing::debug!(title = %title, "document title changed");
                }
                WebViewEvent::NavigationRequested { .. } => {}
                WebViewEvent::NavigationBlocked { url } => {
                    if let Some(bridge) = &self.bridge {
                        bridge.emit("tether:navigation-blocked", &url);
                    }
                }
            }
        }
    }

    fn expire_posts(&self) {
        let Some(bridge) = &self.bridge else {
            return;
        };
        let ttl = Duration::from_secs(self.config.bridge.post_ttl_secs);
        let expired = bridge.expire_posts(ttl);
        if expired > 0 {
            tracing::debug!(expired, "Expired unfetched posts");
        }
    }
}
