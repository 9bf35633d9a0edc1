//! Built-in command table.
//!
//! `builtin` commands need nothing but the async runtime; `window` commands
//! drive the window facade they were registered with.

mod builtin;
mod window;


use tether_bridge::{Callback, Invocation};

pub use self::builtin::register_core;
pub use self::window::register_window;

/// Fetch a required argument or fail the invocation.
fn required<'a>(invocation: &'a Invocation<'_>, key: &str) -> Result<&'a str, String> {
    invocation
        .command
        .get(key)
        .ok_or_else(|| format!("`{}` requires argument `{key}`", invocation.command.name()))
}

/// Complete `callback` from a result whose success carries no value.
fn reply<E: std::fmt::Display>(callback: Callback, result: Result<(), E>) {
    match result {
        Ok(()) => callback.succeed(""),
        Err(e) => callback.fail(e.to_string()),
    };
}
