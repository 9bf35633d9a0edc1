//! Host-side command handlers and the name → handler table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::callback::Callback;
use crate::command::Command;

/// One dispatched command as seen by its handler.
#[derive(Debug)]
pub struct Invocation<'a> {
    pub command: Command,
    /// Binary payload, if the caller supplied a non-empty buffer. Borrowed
    /// for the duration of the call; copy it out to keep it.
    pub buffer: Option<&'a [u8]>,
}

impl Invocation<'_> {
    /// Sequence id of this invocation, empty when the command carries none.
    pub fn seq(&self) -> &str {
        self.command.seq().unwrap_or_default()
    }
}

/// Executes a command and eventually completes its callback exactly once,
/// either before returning or later from any thread.
pub trait Handler: Send + Sync {
    fn call(&self, invocation: Invocation<'_>, callback: Callback);
}

struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(Invocation<'_>, Callback) + Send + Sync,
{
    fn call(&self, invocation: Invocation<'_>, callback: Callback) {
        (self.0)(invocation, callback)
    }
}

/// The host application's command table, shared by every window's bridge.
///
/// Registering a name that already exists replaces the previous handler,
/// which is returned to the caller.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Option<Arc<dyn Handler>> {
        let name = name.into();
        let previous = self.handlers.write().insert(name.clone(), Arc::new(handler));
        if previous.is_some() {
            debug!(command = %name, "handler replaced");
        } else {
            debug!(command = %name, "handler registered");
        }
        previous
    }

    /// Register a closure as the handler for `name`.
    pub fn register_fn<F>(&self, name: impl Into<String>, f: F) -> Option<Arc<dyn Handler>>
    where
        F: Fn(Invocation<'_>, Callback) + Send + Sync + 'static,
    {
        self.register(name, FnHandler(f))
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.write().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.read().contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
