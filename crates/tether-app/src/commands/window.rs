use std::sync::Arc;

use tether_bridge::{Callback, HandlerRegistry, Invocation, SizeHint, Window};

use super::{reply, required};

/// Register the `window.*` commands against `window`.
pub fn register_window(registry: &HandlerRegistry, window: Arc<dyn Window>) {
    let w = Arc::clone(&window);
    registry.register_fn("window.show", move |inv: Invocation<'_>, cb: Callback| {
        reply(cb, w.show(inv.seq()));
    });

    let w = Arc::clone(&window);
    registry.register_fn("window.hide", move |inv: Invocation<'_>, cb: Callback| {
        reply(cb, w.hide(inv.seq()));
    });

    let w = Arc::clone(&window);
    registry.register_fn("window.setTitle", move |inv: Invocation<'_>, cb: Callback| {
        match required(&inv, "title") {
            Ok(title) => reply(cb, w.set_title(inv.seq(), title)),
            Err(e) => {
                cb.fail(e);
            }
        }
    });

    let w = Arc::clone(&window);
    registry.register_fn("window.navigate", move |inv: Invocation<'_>, cb: Callback| {
        match required(&inv, "url") {
            Ok(url) => reply(cb, w.navigate(url, inv.seq())),
            Err(e) => {
                cb.fail(e);
            }
        }
    });

    let w = Arc::clone(&window);
    registry.register_fn("window.setSize", move |inv: Invocation<'_>, cb: Callback| {
        match size_args(&inv) {
            Ok((width, height, hint)) => reply(cb, w.set_size(inv.seq(), width, height, hint)),
            Err(e) => {
                cb.fail(e);
            }
        }
    });

    let w = Arc::clone(&window);
    registry.register_fn("window.inspect", move |_inv: Invocation<'_>, cb: Callback| {
        reply(cb, w.show_inspector());
    });

    let w = Arc::clone(&window);
    registry.register_fn("window.close", move |inv: Invocation<'_>, cb: Callback| {
        match exit_code(&inv) {
            Ok(code) => reply(cb, w.close(code)),
            Err(e) => {
                cb.fail(e);
            }
        }
    });

    registry.register_fn("window.exit", move |inv: Invocation<'_>, cb: Callback| {
        match exit_code(&inv) {
            Ok(code) => reply(cb, window.exit(code)),
            Err(e) => {
                cb.fail(e);
            }
        }
    });
}

fn size_args(inv: &Invocation<'_>) -> Result<(u32, u32, SizeHint), String> {
    let dimension = |key: &str| -> Result<u32, String> {
        let raw = required(inv, key)?;
        raw.parse()
            .map_err(|_| format!("`{key}` must be a non-negative integer, got `{raw}`"))
    };
    let width = dimension("width")?;
    let height = dimension("height")?;
    let hint = match inv.command.get("hint") {
        Some(raw) => raw.parse()?,
        None => SizeHint::default(),
    };
    Ok((width, height, hint))
}

fn exit_code(inv: &Invocation<'_>) -> Result<i32, String> {
    match inv.command.get("code") {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("`code` must be an integer, got `{raw}`")),
        None => Ok(0),
    }
}
