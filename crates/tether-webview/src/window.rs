//! [`tether_bridge::Window`] implementation for a winit + wry window.
//!
//! Every facade call becomes a [`UiCommand`] posted to the event loop, so
//! completions may arrive from any thread and a handler running on the UI
//! thread is never re-entered by its own resolution script.

use std::sync::mpsc;

use parking_lot::Mutex;
use tether_bridge::{MessageCallback, SizeHint, Window};
use tether_common::WindowError;
use tracing::{debug, warn};
use winit::event_loop::EventLoopProxy;

/// Work for the UI thread, delivered as a winit user event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Evaluate(String),
    Show,
    Hide,
    Navigate(String),
    SetTitle(String),
    SetSize {
        width: u32,
        height: u32,
        hint: SizeHint,
    },
    Close(i32),
    Exit(i32),
    ShowInspector,
}

/// Somewhere to post [`UiCommand`]s.
pub trait UiQueue: Send + Sync {
    fn post(&self, command: UiCommand) -> Result<(), WindowError>;
}

/// Queue backed by the winit event loop.
pub struct ProxyQueue(Mutex<EventLoopProxy<UiCommand>>);

impl ProxyQueue {
    pub fn new(proxy: EventLoopProxy<UiCommand>) -> Self {
        Self(Mutex::new(proxy))
    }
}

impl UiQueue for ProxyQueue {
    fn post(&self, command: UiCommand) -> Result<(), WindowError> {
        self.0
            .lock()
            .send_event(command)
            .map_err(|_| WindowError::EventLoopClosed)
    }
}

impl UiQueue for mpsc::Sender<UiCommand> {
    fn post(&self, command: UiCommand) -> Result<(), WindowError> {
        self.send(command).map_err(|_| WindowError::EventLoopClosed)
    }
}

/// The bridge's view of one native window.
pub struct WebViewWindow {
    queue: Box<dyn UiQueue>,
    on_message: MessageCallback,
}

impl WebViewWindow {
    /// `on_message` receives every host-directed message, including the
    /// `ipc://resolve?...` resolutions.
    pub fn new(queue: impl UiQueue + 'static, on_message: MessageCallback) -> Self {
        Self {
            queue: Box::new(queue),
            on_message,
        }
    }
}

impl Window for WebViewWindow {
    fn evaluate(&self, script: &str) {
        if let Err(e) = self.queue.post(UiCommand::Evaluate(script.to_string())) {
            warn!(error = %e, script_len = script.len(), "script dropped");
        }
    }

    fn deliver_to_host(&self, message: &str) {
        (self.on_message)(message);
    }

    fn show(&self, seq: &str) -> Result<(), WindowError> {
        debug!(seq, "show window");
        self.queue.post(UiCommand::Show)
    }

    fn hide(&self, seq: &str) -> Result<(), WindowError> {
        debug!(seq, "hide window");
        self.queue.post(UiCommand::Hide)
    }

    fn navigate(&self, url: &str, seq: &str) -> Result<(), WindowError> {
        debug!(seq, url, "navigate");
        self.queue.post(UiCommand::Navigate(url.to_string()))
    }

    fn set_title(&self, seq: &str, title: &str) -> Result<(), WindowError> {
        debug!(seq, title, "set title");
        self.queue.post(UiCommand::SetTitle(title.to_string()))
    }

    fn set_size(
        &self,
        seq: &str,
        width: u32,
        height: u32,
        hint: SizeHint,
    ) -> Result<(), WindowError> {
        debug!(seq, width, height, ?hint, "set size");
        self.queue.post(UiCommand::SetSize {
            width,
            height,
            hint,
        })
    }

    fn close(&self, code: i32) -> Result<(), WindowError> {
        self.queue.post(UiCommand::Close(code))
    }

    fn exit(&self, code: i32) -> Result<(), WindowError> {
        self.queue.post(UiCommand::Exit(code))
    }

    fn show_inspector(&self) -> Result<(), WindowError> {
        self.queue.post(UiCommand::ShowInspector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn window() -> (WebViewWindow, mpsc::Receiver<UiCommand>, Arc<Mutex<Vec<String>>>) {
        let (tx, rx) = mpsc::channel();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let on_message: MessageCallback = Arc::new(move |m: &str| sink.lock().push(m.to_string()));
        (WebViewWindow::new(tx, on_message), rx, received)
    }

    #[test]
    fn evaluate_is_queued_not_run() {
        let (w, rx, _) = window();
        w.evaluate("1 + 1");
        assert_eq!(rx.try_recv().unwrap(), UiCommand::Evaluate("1 + 1".into()));
    }

    #[test]
    fn chrome_calls_map_to_commands() {
        let (w, rx, _) = window();
        w.show("R1").unwrap();
        w.set_title("R2", "hello").unwrap();
        w.set_size("R3", 640, 480, SizeHint::Min).unwrap();
        w.navigate("tether://localhost/", "").unwrap();
        w.exit(3).unwrap();

        let got: Vec<UiCommand> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                UiCommand::Show,
                UiCommand::SetTitle("hello".into()),
                UiCommand::SetSize {
                    width: 640,
                    height: 480,
                    hint: SizeHint::Min
                },
                UiCommand::Navigate("tether://localhost/".into()),
                UiCommand::Exit(3),
            ]
        );
    }

    #[test]
    fn host_messages_go_to_listener() {
        let (w, rx, received) = window();
        w.deliver_to_host("ipc://resolve?seq=1&state=0&value=ok");
        assert_eq!(
            received.lock().as_slice(),
            ["ipc://resolve?seq=1&state=0&value=ok".to_string()]
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_loop_reports_error() {
        let (w, rx, _) = window();
        drop(rx);
        assert!(matches!(w.hide(""), Err(WindowError::EventLoopClosed)));
        // evaluate swallows the failure
        w.evaluate("x");
    }
}
