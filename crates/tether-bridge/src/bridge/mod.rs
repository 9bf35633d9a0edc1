//! Invocation dispatcher.
//!
//! A [`Bridge`] belongs to one window. It parses render-side messages,
//! looks the command up in the application's [`HandlerRegistry`], runs the
//! handler, and turns the handler's completion into a [`Post`] for the
//! [`Resolver`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::callback::{Callback, Completion, State};
use crate::command::Command;
use crate::handler::{HandlerRegistry, Invocation};
use crate::post::{Post, PostStore};
use crate::resolver::Resolver;
use crate::script;
use crate::window::Window;

#[cfg(test)]
mod tests;

struct Inner {
    handlers: Arc<HandlerRegistry>,
    resolver: Resolver,
    posts: Arc<PostStore>,
}

/// Per-window dispatcher. Cheap to clone; clones share state.
///
/// Callbacks created by [`Bridge::route`] hold only a weak reference, so a
/// completion arriving after the window and its bridge are gone is dropped.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<Inner>,
}

impl Bridge {
    pub fn new(handlers: Arc<HandlerRegistry>, window: Arc<dyn Window>) -> Self {
        Self {
            inner: Arc::new(Inner {
                handlers,
                resolver: Resolver::new(window),
                posts: Arc::new(PostStore::new()),
            }),
        }
    }

    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.inner.handlers
    }

    pub fn resolver(&self) -> &Resolver {
        &self.inner.resolver
    }

    pub fn window(&self) -> &Arc<dyn Window> {
        self.inner.resolver.window()
    }

    /// Binary results waiting for the render side to download them.
    pub fn posts(&self) -> &Arc<PostStore> {
        &self.inner.posts
    }

    /// Parse `message` and dispatch it, answering through [`Bridge::send`].
    ///
    /// A non-empty `buffer` is handed to the handler whether or not the
    /// message carried the binary marker. Returns `false`, without calling
    /// any handler, if the message does not parse or names no registered
    /// command.
    pub fn route(&self, message: &str, buffer: &[u8]) -> bool {
        let command = match Command::parse(message) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, body_len = message.len(), "bridge message rejected: failed to parse");
                return false;
            }
        };

        if !self.inner.handlers.contains(command.name()) {
            warn!(command = %command.name(), "bridge message rejected: unknown command");
            return false;
        }

        let seq = command.seq().unwrap_or_default().to_string();
        let reply_to = command.clone();
        let bridge = Arc::downgrade(&self.inner);
        let callback = Callback::new(seq.clone(), move |completion| match bridge.upgrade() {
            Some(inner) => {
                let state = completion.state;
                Bridge { inner }.send(&reply_to, &seq, state, Post::from(completion));
            }
            None => {
                debug!(command = %reply_to.name(), seq = %seq, "bridge gone; dropping completion");
            }
        });

        self.invoke_with_buffer(command, buffer, callback)
    }

    /// Run the handler bound to `command` with no binary payload.
    ///
    /// Returns `false` if no handler is registered; `callback` is then
    /// never invoked.
    pub fn invoke(&self, command: Command, callback: Callback) -> bool {
        self.dispatch(command, None, callback)
    }

    /// Run the handler bound to `command`, passing `buffer` if non-empty.
    pub fn invoke_with_buffer(&self, command: Command, buffer: &[u8], callback: Callback) -> bool {
        let buffer = (!buffer.is_empty()).then_some(buffer);
        self.dispatch(command, buffer, callback)
    }

    fn dispatch(&self, command: Command, buffer: Option<&[u8]>, callback: Callback) -> bool {
        let Some(handler) = self.inner.handlers.get(command.name()) else {
            debug!(command = %command.name(), "no handler registered");
            callback.disarm();
            return false;
        };

        let name = command.name().to_string();
        debug!(
            command = %name,
            seq = %callback.seq(),
            buffer_len = buffer.map_or(0, <[u8]>::len),
            "dispatching"
        );

        // A panicking handler must still answer its caller.
        let guard = callback.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.call(Invocation { command, buffer }, callback)
        }));

        if let Err(payload) = outcome {
            let reason = panic_message(payload.as_ref());
            error!(command = %name, seq = %guard.seq(), reason = %reason, "handler panicked");
            if !guard.is_completed() {
                guard.complete(Completion::failure(format!(
                    "handler `{name}` panicked: {reason}"
                )));
            }
        }

        true
    }

    /// Deliver a finished post for `seq` to the resolver.
    ///
    /// Binary attachments are parked in the post store and the resolution
    /// carries the id under which the render side can fetch them.
    pub fn send(&self, command: &Command, seq: &str, state: State, post: Post) {
        match post.bytes {
            Some(bytes) => {
                let post_id = self.inner.posts.put(bytes);
                debug!(command = %command.name(), seq, post_id = %post_id, "sending post");
                self.inner
                    .resolver
                    .resolve(seq, state, &post.value, Some(&post_id));
            }
            None => {
                debug!(command = %command.name(), seq, ?state, "sending result");
                self.inner.resolver.resolve_promise(seq, state, &post.value);
            }
        }
    }

    /// Fire a DOM event named `event` in the render runtime.
    pub fn emit(&self, event: &str, value: &str) {
        debug!(event, "emitting render event");
        self.window().evaluate(&script::emit_script(event, value));
    }

    /// Drop stored posts the render side never fetched.
    pub fn expire_posts(&self, ttl: Duration) -> usize {
        self.inner.posts.expire(ttl)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
