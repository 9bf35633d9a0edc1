use tether_bridge::{Callback, Completion, HandlerRegistry, Invocation};
use tokio::runtime::Handle;
use tracing::{debug, error, info, trace, warn};

use super::required;

/// Register `ping`, `echo`, `log`, and the async `readFile`.
pub fn register_core(registry: &HandlerRegistry, runtime: Handle) {
    registry.register_fn("ping", |_inv: Invocation<'_>, cb: Callback| {
        cb.succeed("pong");
    });

    registry.register_fn("echo", echo);
    registry.register_fn("log", log);

    registry.register_fn("readFile", move |inv: Invocation<'_>, cb: Callback| {
        let path = match required(&inv, "path") {
            Ok(path) => path.to_string(),
            Err(e) => {
                cb.fail(e);
                return;
            }
        };
        runtime.spawn(async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    debug!(path = %path, len = bytes.len(), "file read");
                    cb.complete(Completion::success(bytes.len().to_string()).with_bytes(bytes));
                }
                Err(e) => {
                    cb.fail(format!("{path}: {e}"));
                }
            }
        });
    });
}

/// Return `text`, and any uploaded bytes as a post.
fn echo(inv: Invocation<'_>, cb: Callback) {
    let text = inv.command.get("text").unwrap_or_default().to_string();
    let completion = match inv.buffer {
        Some(bytes) => Completion::success(text).with_bytes(bytes.to_vec()),
        None => Completion::success(text),
    };
    cb.complete(completion);
}

/// Forward a render-side log line into tracing.
fn log(inv: Invocation<'_>, cb: Callback) {
    let message = inv.command.get("message").unwrap_or_default();
    match inv.command.get("level").unwrap_or("info") {
        "trace" => trace!(target: "tether::render", "{message}"),
        "debug" => debug!(target: "tether::render", "{message}"),
        "info" => info!(target: "tether::render", "{message}"),
        "warn" => warn!(target: "tether::render", "{message}"),
        "error" => error!(target: "tether::render", "{message}"),
        other => {
            cb.fail(format!("unknown log level `{other}`"));
            return;
        }
    }
    cb.succeed("");
}
