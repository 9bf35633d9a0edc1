//! Graceful shutdown: release the bridge, destroy the webview, stop workers.

use std::time::Duration;

use tether_common::Event;

use super::core::TetherApp;

impl TetherApp {
    /// Perform graceful shutdown of all subsystems.
    ///
    /// The bridge goes first so late completions from workers are dropped
    /// instead of queuing scripts for a webview that no longer exists.
    pub(super) fn shutdown(&mut self) {
        if self.tokio_runtime.is_none() && self.bridge.is_none() {
            return;
        }
        tracing::info!("Initiating graceful shutdown");

        self.bridge = None;
        self.webview = None;
        self.event_bus.publish(Event::Shutdown);

        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }

        self.window = None;
        tracing::info!("Graceful shutdown complete");
    }
}
