//! Script side of the bridge.
//!
//! Messages flow in both directions:
//! - **render -> host**: `window.__tether.invoke(name, args, buffer)` builds a
//!   wire-form command with a fresh `R<n>` sequence id and posts it through
//!   `window.ipc.postMessage`. Commands with a buffer are `POST`ed to the
//!   `tether://localhost/ipc` protocol instead, with the bytes as the body.
//! - **host -> render**: the host evaluates the snippets built below, which
//!   settle the promise stored under `<n>` or fire a DOM event.

use crate::callback::State;

/// Global installed by [`INIT_SCRIPT`].
pub const RUNTIME_GLOBAL: &str = "window.__tether";

/// Installs the render-side promise table. Injected as an initialization
/// script into every webview.
pub const INIT_SCRIPT: &str = r#"
(function() {
    if (window.__tether) { return; }
    var origin = (location.protocol === 'http:' && location.hostname === 'tether.localhost')
        ? 'http://tether.localhost'
        : 'tether://localhost';
    var enc = encodeURIComponent;

    window.__tether = {
        _seq: 0,
        _pending: {},

        invoke: function(name, args, buffer) {
            var id = String(++this._seq);
            var parts = [enc(name), 'seq=' + enc('R' + id)];
            args = args || {};
            Object.keys(args).forEach(function(key) {
                if (key === 'seq') { return; }
                parts.push(enc(key) + '=' + enc(String(args[key])));
            });
            var self = this;
            var promise = new Promise(function(resolve, reject) {
                self._pending[id] = { resolve: resolve, reject: reject };
            });
            if (buffer) {
                parts.push('@binary');
                fetch(origin + '/ipc?' + enc(parts.join(' ')), { method: 'POST', body: buffer })
                    .catch(function(err) { self.resolve(id, 1, String(err), null); });
            } else {
                window.ipc.postMessage(parts.join(' '));
            }
            return promise;
        },

        resolve: function(id, state, value, post) {
            var pending = this._pending[id];
            if (!pending) { return; }
            delete this._pending[id];
            var settle = state === 0 ? pending.resolve : pending.reject;
            if (!post) {
                settle(state === 0 ? value : new Error(value));
                return;
            }
            fetch(origin + '/post/' + post)
                .then(function(res) { return res.arrayBuffer(); })
                .then(function(data) { settle({ value: value, data: data }); })
                .catch(function(err) { pending.reject(err); });
        },

        emit: function(event, value) {
            window.dispatchEvent(new CustomEvent(event, { detail: value }));
        }
    };
})();
"#;

/// Quote `value` as a JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script settling the render-side promise stored under `promise_id`.
pub fn resolve_script(promise_id: &str, state: State, value: &str, post: Option<&str>) -> String {
    let post = post.map(js_string).unwrap_or_else(|| "null".to_string());
    format!(
        "{RUNTIME_GLOBAL}.resolve({}, {}, {}, {});",
        js_string(promise_id),
        state.code(),
        js_string(value),
        post,
    )
}

/// Script dispatching a `CustomEvent` named `event` with `value` as detail.
pub fn emit_script(event: &str, value: &str) -> String {
    format!(
        "{RUNTIME_GLOBAL}.emit({}, {});",
        js_string(event),
        js_string(value)
    )
}
