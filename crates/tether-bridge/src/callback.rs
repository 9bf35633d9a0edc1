//! Invocation callbacks: the one-shot completion handed to every handler.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

/// Value delivered when a callback is dropped without being completed.
pub const DROPPED_MESSAGE: &str = "invocation callback dropped without completion";

/// Outcome of an invocation. Encoded as `0` / `1` on both wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Success,
    Failure,
}

impl State {
    pub fn code(self) -> u8 {
        match self {
            State::Success => 0,
            State::Failure => 1,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "success" => Ok(State::Success),
            "1" | "failure" | "error" => Ok(State::Failure),
            other => Err(format!("unknown completion state `{other}`")),
        }
    }
}

/// What a handler reports when it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub state: State,
    pub value: String,
    pub bytes: Option<Vec<u8>>,
}

impl Completion {
    pub fn success(value: impl Into<String>) -> Self {
        Self {
            state: State::Success,
            value: value.into(),
            bytes: None,
        }
    }

    pub fn failure(value: impl Into<String>) -> Self {
        Self {
            state: State::Failure,
            value: value.into(),
            bytes: None,
        }
    }

    /// Attach a binary result.
    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.bytes = Some(bytes);
        self
    }
}

type Sink = Box<dyn FnOnce(Completion) + Send>;

struct Shared {
    seq: String,
    fired: AtomicBool,
    sink: Mutex<Option<Sink>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let Some(sink) = self.sink.get_mut().take() else {
            return;
        };
        if *self.fired.get_mut() {
            return;
        }
        warn!(seq = %self.seq, "invocation callback dropped without completion");
        sink(Completion::failure(DROPPED_MESSAGE));
    }
}

/// One-shot completion handle for a single invocation.
///
/// The handler owns it and may move it to another thread or task. Clones
/// share the same completion slot: only the first [`Callback::complete`]
/// across all clones is delivered, later ones are logged and ignored.
///
/// If every clone is dropped without completing, a failure completion is
/// delivered so the waiting promise is rejected rather than leaked.
#[derive(Clone)]
pub struct Callback {
    shared: Arc<Shared>,
}

impl Callback {
    pub fn new(seq: impl Into<String>, sink: impl FnOnce(Completion) + Send + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                seq: seq.into(),
                fired: AtomicBool::new(false),
                sink: Mutex::new(Some(Box::new(sink))),
            }),
        }
    }

    /// Sequence id of the invocation this callback answers.
    pub fn seq(&self) -> &str {
        &self.shared.seq
    }

    pub fn is_completed(&self) -> bool {
        self.shared.fired.load(Ordering::Acquire)
    }

    /// Deliver the completion. Returns `false` if this invocation was
    /// already completed, in which case `completion` is discarded.
    pub fn complete(self, completion: Completion) -> bool {
        if self.shared.fired.swap(true, Ordering::AcqRel) {
            warn!(
                seq = %self.shared.seq,
                state = ?completion.state,
                "invocation callback completed more than once; ignoring"
            );
            return false;
        }
        // Take the sink out before calling it so the lock is not held
        // across arbitrary delivery code.
        let sink = self.shared.sink.lock().take();
        match sink {
            Some(sink) => {
                sink(completion);
                true
            }
            None => false,
        }
    }

    pub fn succeed(self, value: impl Into<String>) -> bool {
        self.complete(Completion::success(value))
    }

    pub fn fail(self, value: impl Into<String>) -> bool {
        self.complete(Completion::failure(value))
    }

    /// Mark as completed without delivering anything.
    pub(crate) fn disarm(&self) {
        self.shared.fired.store(true, Ordering::Release);
        self.shared.sink.lock().take();
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("seq", &self.shared.seq)
            .field("completed", &self.is_completed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn recording(seq: &str) -> (Callback, mpsc::Receiver<Completion>) {
        let (tx, rx) = mpsc::channel();
        let cb = Callback::new(seq, move |c| {
            let _ = tx.send(c);
        });
        (cb, rx)
    }

    #[test]
    fn state_codes() {
        assert_eq!(State::Success.to_string(), "0");
        assert_eq!(State::Failure.to_string(), "1");
        assert_eq!("0".parse::<State>(), Ok(State::Success));
        assert_eq!("failure".parse::<State>(), Ok(State::Failure));
        assert_eq!("error".parse::<State>(), Ok(State::Failure));
        assert!("2".parse::<State>().is_err());
    }

    #[test]
    fn completes_once() {
        let (cb, rx) = recording("R1");
        assert_eq!(cb.seq(), "R1");
        assert!(cb.succeed("done"));

        assert_eq!(rx.try_recv().unwrap(), Completion::success("done"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn second_completion_through_clone_is_ignored() {
        let (cb, rx) = recording("R1");
        let twin = cb.clone();

        assert!(cb.succeed("first"));
        assert!(twin.is_completed());
        assert!(!twin.fail("second"));

        assert_eq!(rx.try_recv().unwrap().value, "first");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropping_uncompleted_callback_delivers_failure() {
        let (cb, rx) = recording("R5");
        let twin = cb.clone();
        drop(cb);
        assert!(rx.try_recv().is_err(), "a live clone keeps it pending");

        drop(twin);
        let delivered = rx.try_recv().unwrap();
        assert_eq!(delivered.state, State::Failure);
        assert_eq!(delivered.value, DROPPED_MESSAGE);
    }

    #[test]
    fn disarmed_callback_never_fires() {
        let (cb, rx) = recording("R6");
        cb.disarm();
        assert!(!cb.clone().succeed("late"));
        drop(cb);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn completes_from_another_thread() {
        let (cb, rx) = recording("R8");
        std::thread::spawn(move || {
            cb.complete(Completion::success("bytes").with_bytes(vec![1, 2, 3]));
        })
        .join()
        .unwrap();

        let delivered = rx.recv().unwrap();
        assert_eq!(delivered.bytes, Some(vec![1, 2, 3]));
    }
}
