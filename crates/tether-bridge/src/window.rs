//! Capability surface the bridge needs from the embedding window.
//!
//! The bridge only ever calls [`Window::evaluate`] and
//! [`Window::deliver_to_host`]. The chrome operations exist so command
//! handlers can map bridge commands onto the window they belong to.

use std::str::FromStr;
use std::sync::Arc;

use tether_common::WindowError;

/// Host-side message listener. Supplied explicitly when a window is built;
/// there is no implicit default.
pub type MessageCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// How `set_size` dimensions are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeHint {
    /// Width and height are the current size.
    #[default]
    None,
    /// Width and height are minimum bounds.
    Min,
    /// Width and height are maximum bounds.
    Max,
    /// The user can not resize the window.
    Fixed,
}

impl FromStr for SizeHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "none" => Ok(SizeHint::None),
            "1" | "min" => Ok(SizeHint::Min),
            "2" | "max" => Ok(SizeHint::Max),
            "3" | "fixed" => Ok(SizeHint::Fixed),
            other => Err(format!("unknown size hint `{other}`")),
        }
    }
}

/// A native window hosting one render surface.
///
/// Implementations must be shareable across threads: completions arrive
/// from worker threads as well as from the UI thread.
pub trait Window: Send + Sync {
    /// Schedule `script` for execution in the render runtime.
    ///
    /// Fire-and-forget. Implementations queue the script onto the UI
    /// thread's own event queue rather than running it in place, so a
    /// handler still executing on the UI thread is never re-entered.
    fn evaluate(&self, script: &str);

    /// Hand `message` to the host-side listener.
    fn deliver_to_host(&self, message: &str);

    fn show(&self, seq: &str) -> Result<(), WindowError>;

    fn hide(&self, seq: &str) -> Result<(), WindowError>;

    fn navigate(&self, url: &str, seq: &str) -> Result<(), WindowError>;

    fn set_title(&self, seq: &str, title: &str) -> Result<(), WindowError>;

    fn set_size(&self, seq: &str, width: u32, height: u32, hint: SizeHint)
        -> Result<(), WindowError>;

    /// Close this window, reporting `code` to the exit listener.
    fn close(&self, code: i32) -> Result<(), WindowError>;

    /// Shut down the whole application.
    fn exit(&self, code: i32) -> Result<(), WindowError>;

    fn show_inspector(&self) -> Result<(), WindowError> {
        Err(WindowError::NotSupported("inspector".into()))
    }

    /// Show a context menu built from `menu`; the pick answers `seq`.
    fn set_context_menu(&self, seq: &str, menu: &str) -> Result<(), WindowError> {
        let _ = (seq, menu);
        Err(WindowError::NotSupported("context menu".into()))
    }

    /// Replace the application menu bar with `menu`.
    fn set_system_menu(&self, seq: &str, menu: &str) -> Result<(), WindowError> {
        let _ = (seq, menu);
        Err(WindowError::NotSupported("system menu".into()))
    }

    fn set_background_color(&self, r: u8, g: u8, b: u8, alpha: f32) -> Result<(), WindowError> {
        let _ = (r, g, b, alpha);
        Err(WindowError::NotSupported("background color".into()))
    }
}
