//! Promise resolution across the host/render boundary.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::callback::State;
use crate::command::{Command, SEQ_KEY};
use crate::script;
use crate::seq::{self, Origin};
use crate::window::Window;

/// Name of the command every host-side resolution message carries.
pub const RESOLVE_COMMAND: &str = "resolve";

/// Delivers completions to whichever side is waiting on them.
///
/// A render-originated sequence id (`R<n>`) gets a script settling promise
/// `<n>` in the render runtime. Every completion, render-originated or not,
/// is also delivered to the host listener as
/// `ipc://resolve?seq=..&state=..&value=..`, so host observers see the
/// result even when the render side was the one waiting.
#[derive(Clone)]
pub struct Resolver {
    window: Arc<dyn Window>,
}

impl Resolver {
    pub fn new(window: Arc<dyn Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Arc<dyn Window> {
        &self.window
    }

    pub fn resolve_promise(&self, seq: &str, state: State, value: &str) {
        self.resolve(seq, state, value, None);
    }

    /// Like [`Resolver::resolve_promise`], with an optional id of a stored
    /// post the render side should download alongside `value`.
    pub fn resolve(&self, seq: &str, state: State, value: &str, post: Option<&str>) {
        match seq::render_promise_id(seq) {
            Some(id) => {
                debug!(seq, ?state, "resolving render promise");
                self.window
                    .evaluate(&script::resolve_script(id, state, value, post));
            }
            None if seq::origin(seq) == Origin::Render => {
                warn!(seq, "render sequence id without a promise id; skipping render side");
            }
            None => {}
        }

        self.window
            .deliver_to_host(&host_message(seq, state, value, post));
    }
}

/// Host-directed message encoding a completion.
pub fn host_message(seq: &str, state: State, value: &str, post: Option<&str>) -> String {
    let state = state.to_string();
    let mut pairs = vec![(SEQ_KEY, seq), ("state", state.as_str()), ("value", value)];
    if let Some(post) = post {
        pairs.push(("post", post));
    }
    Command::from_trusted(RESOLVE_COMMAND, pairs).to_uri()
}
