//! Host/render message bridge.
//!
//! Commands arrive from the render side as text, are parsed into a
//! [`Command`], routed by name to a registered [`Handler`], and completed
//! through an [`Callback`]. Completions are handed to the [`Resolver`],
//! which resolves the render-side promise (for `R`-prefixed sequence ids)
//! and always informs the host listener.
//!
//! The bridge never touches a platform window directly; everything it needs
//! from the embedding surface goes through the [`Window`] trait.

pub mod bridge;
pub mod callback;
pub mod command;
pub mod handler;
pub mod post;
pub mod resolver;
pub mod script;
pub mod seq;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::Bridge;
pub use callback::{Callback, Completion, State};
pub use command::{Command, ParseError, BINARY_MARKER, URI_SCHEME};
pub use handler::{Handler, HandlerRegistry, Invocation};
pub use post::{Post, PostStore};
pub use resolver::Resolver;
pub use seq::{Origin, RENDER_MARKER};
pub use window::{MessageCallback, SizeHint, Window};
