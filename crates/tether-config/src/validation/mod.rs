//! Configuration validation.
//!
//! Each section is checked independently and every problem is collected
//! into a single `ConfigError`.

mod helpers;


use crate::schema::TetherConfig;
use helpers::{validate_non_empty, validate_range};
use tether_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TetherConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_bridge(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_window(errors: &mut Vec<String>, config: &TetherConfig) {
    let w = &config.window;
    validate_range(errors, "window.width", w.width as u64, 100, 16384);
    validate_range(errors, "window.height", w.height as u64, 100, 16384);
    if w.min_width > w.width {
        errors.push(format!(
            "window.min_width = {} exceeds window.width = {}",
            w.min_width, w.width
        ));
    }
    if w.min_height > w.height {
        errors.push(format!(
            "window.min_height = {} exceeds window.height = {}",
            w.min_height, w.height
        ));
    }
    validate_non_empty(errors, "window.url", &w.url);
}

fn validate_bridge(errors: &mut Vec<String>, config: &TetherConfig) {
    let b = &config.bridge;
    validate_range(errors, "bridge.post_ttl_secs", b.post_ttl_secs, 1, 86_400);
    for (i, prefix) in b.allowed_navigation.iter().enumerate() {
        validate_non_empty(errors, &format!("bridge.allowed_navigation[{i}]"), prefix);
    }
}
