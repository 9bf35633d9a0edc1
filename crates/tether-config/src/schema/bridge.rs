//! Bridge configuration types.

use serde::{Deserialize, Serialize};

/// Behavior of the host/render bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Seconds a binary result waits for the render side before it is
    /// discarded (valid range: 1-86400).
    pub post_ttl_secs: u64,
    /// URL prefixes the webview may navigate to.
    pub allowed_navigation: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            post_ttl_secs: 60,
            allowed_navigation: vec![
                "tether://".into(),
                "http://tether.localhost".into(),
                "about:blank".into(),
            ],
        }
    }
}
