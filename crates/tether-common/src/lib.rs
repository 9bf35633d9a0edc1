//! Shared types for the tether workspace: error taxonomy, id generation,
//! and the host-side event bus.

pub mod errors;
pub mod events;
pub mod id;

pub use errors::{ConfigError, WindowError};
pub use events::{Event, EventBus};
pub use id::new_post_id;
