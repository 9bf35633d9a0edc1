//! Sequence id convention.
//!
//! The first character of a sequence id says where the caller is waiting.
//! `R<id>` means a promise registered under `<id>` in the render runtime;
//! anything else, including an empty id, is answered on the host side only.

/// Leading marker of a render-originated sequence id.
pub const RENDER_MARKER: char = 'R';

/// Which side is waiting on a sequence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Render,
    Host,
}

/// Classify a sequence id by its leading marker.
pub fn origin(seq: &str) -> Origin {
    if seq.starts_with(RENDER_MARKER) {
        Origin::Render
    } else {
        Origin::Host
    }
}

/// The render-side promise id addressed by `seq`.
///
/// Returns `None` for host-side ids and for a bare marker with nothing
/// after it, since there is no promise to address.
pub fn render_promise_id(seq: &str) -> Option<&str> {
    seq.strip_prefix(RENDER_MARKER).filter(|id| !id.is_empty())
}
