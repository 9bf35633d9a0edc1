//! Dispatcher tests: routing, sync/async completion, and delivery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use super::*;
use crate::callback::DROPPED_MESSAGE;
use crate::testing::RecordingWindow;

const WAIT: Duration = Duration::from_secs(5);

fn setup() -> (Bridge, Arc<HandlerRegistry>, Arc<RecordingWindow>) {
    let handlers = Arc::new(HandlerRegistry::new());
    let window = Arc::new(RecordingWindow::default());
    let bridge = Bridge::new(handlers.clone(), window.clone());
    (bridge, handlers, window)
}

fn recording_callback(seq: &str) -> (Callback, Arc<Mutex<Vec<Completion>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let cb = Callback::new(seq, move |c| sink.lock().push(c));
    (cb, seen)
}

// =============================================================================
// ROUTING
// =============================================================================

#[test]
fn route_unknown_command_returns_false_without_calls() {
    let (bridge, handlers, window) = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    handlers.register_fn("ping", move |_, cb: Callback| {
        counter.fetch_add(1, Ordering::SeqCst);
        cb.succeed("pong");
    });

    assert!(!bridge.route("readFile seq=R1 path=/tmp/x", &[]));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(window.log().is_empty());
}

#[test]
fn route_unparsable_message_returns_false() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("ping", |_, cb: Callback| {
        cb.succeed("pong");
    });

    assert!(!bridge.route("", &[]));
    assert!(!bridge.route("ping seq=1 seq=2", &[]));
    assert!(!bridge.route("ping @binary extra=1", &[]));
    assert!(window.log().is_empty());
}

#[test]
fn route_passes_arguments_and_seq() {
    let (bridge, handlers, window) = setup();
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    handlers.register_fn("greet", move |inv, cb: Callback| {
        *slot.lock() = Some((inv.seq().to_string(), inv.command.get("name").map(str::to_string)));
        cb.succeed("hi");
    });

    assert!(bridge.route("greet seq=R3 name=Ada%20L", &[]));
    assert_eq!(
        *seen.lock(),
        Some(("R3".to_string(), Some("Ada L".to_string())))
    );
    assert_eq!(window.scripts().len(), 1);
    assert_eq!(window.host_messages().len(), 1);
}

#[test]
fn route_attaches_non_empty_buffer_regardless_of_marker() {
    let (bridge, handlers, _window) = setup();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let slot = seen.clone();
    handlers.register_fn("upload", move |inv, cb: Callback| {
        slot.lock().push((
            inv.command.has_binary_payload(),
            inv.buffer.map(<[u8]>::to_vec),
        ));
        cb.succeed("");
    });

    assert!(bridge.route("upload seq=R1", &[1, 2, 3]));
    assert!(bridge.route("upload seq=R2 @binary", &[]));

    let seen = seen.lock();
    assert_eq!(seen[0], (false, Some(vec![1, 2, 3])));
    assert_eq!(seen[1], (true, None));
}

// =============================================================================
// INVOKE
// =============================================================================

#[test]
fn sync_handler_completes_before_invoke_returns() {
    let (bridge, handlers, _window) = setup();
    handlers.register_fn("ping", |_, cb: Callback| {
        cb.succeed("pong");
    });

    let (cb, seen) = recording_callback("R1");
    let command = Command::parse("ping seq=R1").unwrap();
    assert!(bridge.invoke(command, cb));

    assert_eq!(*seen.lock(), vec![Completion::success("pong")]);
}

#[test]
fn async_handler_returns_before_completion() {
    let (bridge, handlers, _window) = setup();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = Arc::new(Mutex::new(Some(release_rx)));

    handlers.register_fn("slow", move |_, cb: Callback| {
        let Some(release) = release_rx.lock().take() else {
            cb.fail("already used");
            return;
        };
        thread::spawn(move || {
            let _ = release.recv();
            cb.succeed("done");
        });
    });

    let (done_tx, done_rx) = mpsc::channel();
    let cb = Callback::new("R2", move |c| {
        let _ = done_tx.send(c);
    });
    let observer = cb.clone();

    assert!(bridge.invoke(Command::parse("slow seq=R2").unwrap(), cb));
    assert!(!observer.is_completed());
    drop(observer);

    release_tx.send(()).unwrap();
    assert_eq!(done_rx.recv_timeout(WAIT).unwrap(), Completion::success("done"));
    assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn invoke_unknown_command_never_fires_callback() {
    let (bridge, _handlers, _window) = setup();
    let (cb, seen) = recording_callback("R1");

    assert!(!bridge.invoke(Command::parse("missing seq=R1").unwrap(), cb));
    assert!(seen.lock().is_empty());
}

#[test]
fn invoke_with_buffer_hands_bytes_to_handler() {
    let (bridge, handlers, _window) = setup();
    handlers.register_fn("size", |inv, cb: Callback| {
        let len = inv.buffer.map_or(0, <[u8]>::len);
        cb.succeed(len.to_string());
    });

    let (cb, seen) = recording_callback("1");
    let buf = vec![0u8; 1024];
    assert!(bridge.invoke_with_buffer(Command::parse("size").unwrap(), &buf, cb));
    assert_eq!(seen.lock()[0].value, "1024");
}

// =============================================================================
// COMPLETION SAFETY
// =============================================================================

#[test]
fn double_completion_only_delivers_first() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("twice", |_, cb: Callback| {
        let twin = cb.clone();
        assert!(cb.succeed("first"));
        assert!(!twin.succeed("second"));
    });

    assert!(bridge.route("twice seq=R4", &[]));
    assert_eq!(
        window.scripts(),
        vec![r#"window.__tether.resolve("4", 0, "first", null);"#.to_string()]
    );
    assert_eq!(window.host_messages().len(), 1);
}

#[test]
fn panicking_handler_becomes_failure_and_dispatcher_survives() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("explode", |_, _cb: Callback| {
        panic!("kaboom");
    });
    handlers.register_fn("ping", |_, cb: Callback| {
        cb.succeed("pong");
    });

    assert!(bridge.route("explode seq=R1", &[]));
    let hosts = window.host_messages();
    assert_eq!(hosts.len(), 1);
    let reply = Command::parse(&hosts[0]).unwrap();
    assert_eq!(reply.get("state"), Some("1"));
    assert!(reply.get("value").unwrap().contains("kaboom"));

    assert!(bridge.route("ping seq=R2", &[]));
    assert_eq!(window.host_messages().len(), 2);
}

#[test]
fn handler_that_drops_callback_rejects_promise() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("forgetful", |_, cb: Callback| drop(cb));

    assert!(bridge.route("forgetful seq=R8", &[]));
    let reply = Command::parse(&window.host_messages()[0]).unwrap();
    assert_eq!(reply.get("state"), Some("1"));
    assert_eq!(reply.get("value"), Some(DROPPED_MESSAGE));
}

#[test]
fn handler_failure_reaches_both_sides() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("readFile", |_, cb: Callback| {
        cb.fail("ENOENT");
    });

    assert!(bridge.route("readFile seq=R11 path=/nope", &[]));
    assert_eq!(
        window.scripts(),
        vec![r#"window.__tether.resolve("11", 1, "ENOENT", null);"#.to_string()]
    );
    assert_eq!(
        window.host_messages(),
        vec!["ipc://resolve?seq=R11&state=1&value=ENOENT".to_string()]
    );
}

#[test]
fn completion_after_bridge_dropped_is_discarded() {
    let (bridge, handlers, window) = setup();
    let parked = Arc::new(Mutex::new(None));
    let slot = parked.clone();
    handlers.register_fn("later", move |_, cb: Callback| {
        *slot.lock() = Some(cb);
    });

    assert!(bridge.route("later seq=R1", &[]));
    drop(bridge);

    let cb = parked.lock().take().unwrap();
    assert!(cb.succeed("too late"));
    assert!(window.log().is_empty());
}

// =============================================================================
// DELIVERY
// =============================================================================

#[test]
fn read_file_scenario_resolves_render_and_host() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("readFile", |inv, cb: Callback| {
        let path = inv.command.get("path").unwrap_or_default().to_string();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            assert_eq!(path, "/tmp/x");
            cb.succeed("file contents");
        });
    });

    assert!(bridge.route("readFile seq=R7 path=/tmp/x", &[]));

    let hosts = window.wait_for_host_messages(1, WAIT);
    assert_eq!(
        hosts,
        vec!["ipc://resolve?seq=R7&state=0&value=file%20contents".to_string()]
    );
    assert_eq!(
        window.scripts(),
        vec![r#"window.__tether.resolve("7", 0, "file contents", null);"#.to_string()]
    );
}

#[test]
fn host_seq_skips_render_side() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("ping", |_, cb: Callback| {
        cb.succeed("pong");
    });

    assert!(bridge.route("ping seq=12", &[]));
    assert!(window.scripts().is_empty());
    assert_eq!(
        window.host_messages(),
        vec!["ipc://resolve?seq=12&state=0&value=pong".to_string()]
    );
}

#[test]
fn binary_result_is_parked_as_post() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("thumbnail", |_, cb: Callback| {
        cb.complete(Completion::success("image/png").with_bytes(vec![0x89, b'P', b'N', b'G']));
    });

    assert!(bridge.route("thumbnail seq=R5", &[]));

    let reply = Command::parse(&window.host_messages()[0]).unwrap();
    let post_id = reply.get("post").unwrap().to_string();
    assert_eq!(reply.get("value"), Some("image/png"));
    assert!(window.scripts()[0].contains(&format!("\"{post_id}\"")));
    assert_eq!(
        bridge.posts().take(&post_id),
        Some(vec![0x89, b'P', b'N', b'G'])
    );
}

#[test]
fn send_without_bytes_resolves_directly() {
    let (bridge, _handlers, window) = setup();
    let command = Command::parse("ping seq=R3").unwrap();
    bridge.send(&command, "R3", State::Success, Post::new("pong"));

    assert_eq!(window.scripts().len(), 1);
    assert!(bridge.posts().is_empty());
}

#[test]
fn emit_evaluates_event_script() {
    let (bridge, _handlers, window) = setup();
    bridge.emit("focus", "");
    assert_eq!(
        window.scripts(),
        vec![r#"window.__tether.emit("focus", "");"#.to_string()]
    );
    assert!(window.host_messages().is_empty());
}

#[test]
fn concurrent_routes_each_resolve_once() {
    let (bridge, handlers, window) = setup();
    handlers.register_fn("ping", |inv, cb: Callback| {
        let seq = inv.seq().to_string();
        if seq.ends_with('0') {
            thread::spawn(move || {
                cb.succeed(seq);
            });
        } else {
            cb.succeed(seq);
        }
    });

    let threads: Vec<_> = (0..8)
        .map(|t| {
            let bridge = bridge.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    assert!(bridge.route(&format!("ping seq=R{t}-{i}"), &[]));
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let hosts = window.wait_for_host_messages(400, WAIT);
    assert_eq!(hosts.len(), 400);
    assert_eq!(window.scripts().len(), 400);
}

#[test]
fn registration_during_dispatch_is_safe() {
    let (bridge, handlers, window) = setup();
    let registry = handlers.clone();
    handlers.register_fn("install", move |inv, cb: Callback| {
        let name = inv.command.get("name").unwrap_or("extra").to_string();
        registry.register_fn(name, |_, cb: Callback| {
            cb.succeed("installed");
        });
        cb.succeed("");
    });

    assert!(!bridge.route("extra seq=1", &[]));
    assert!(bridge.route("install seq=2 name=extra", &[]));
    assert!(bridge.route("extra seq=3", &[]));
    assert_eq!(window.host_messages().len(), 2);
}

#[test]
fn expire_posts_drops_unfetched_attachments() {
    let (bridge, handlers, _window) = setup();
    handlers.register_fn("blob", |_, cb: Callback| {
        cb.complete(Completion::success("").with_bytes(vec![1]));
    });
    assert!(bridge.route("blob seq=R1", &[]));
    assert_eq!(bridge.posts().len(), 1);

    assert_eq!(bridge.expire_posts(Duration::ZERO), 1);
    assert!(bridge.posts().is_empty());
}
