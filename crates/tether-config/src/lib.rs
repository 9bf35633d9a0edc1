//! Tether configuration.
//!
//! TOML-based configuration for the window, the bridge, and logging. All
//! sections use sensible defaults so partial configs work out of the box.
//!
//! ```rust,no_run
//! use tether_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config.window.title);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BridgeConfig, LogLevel, LoggingConfig, TetherConfig, WindowConfig};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use tether_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<TetherConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
