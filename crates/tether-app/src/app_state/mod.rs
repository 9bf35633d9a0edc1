//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the native window, its webview, and the bridge between
//! them.

mod core;
mod event_handler;
mod init;
mod polling;
mod shutdown;
mod types;
mod ui_commands;

pub use core::TetherApp;
