//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod system;
mod window;

pub use bridge::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    pub window: WindowConfig,
    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}
