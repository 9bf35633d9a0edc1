//! In-memory window used by the bridge's tests.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tether_common::WindowError;

use crate::window::{SizeHint, Window};

/// Records every facade call as `"<kind>:<payload>"` in call order.
#[derive(Default)]
pub(crate) struct RecordingWindow {
    log: Mutex<Vec<String>>,
    changed: Condvar,
}

impl RecordingWindow {
    fn record(&self, entry: String) {
        self.log.lock().push(entry);
        self.changed.notify_all();
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter_map(|e| e.strip_prefix(prefix).map(str::to_string))
            .collect()
    }

    pub(crate) fn scripts(&self) -> Vec<String> {
        self.with_prefix("eval:")
    }

    pub(crate) fn host_messages(&self) -> Vec<String> {
        self.with_prefix("host:")
    }

    /// Block until at least `count` host messages arrived or `timeout` passed.
    pub(crate) fn wait_for_host_messages(&self, count: usize, timeout: Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        let mut log = self.log.lock();
        loop {
            let arrived = log.iter().filter(|e| e.starts_with("host:")).count();
            if arrived >= count {
                break;
            }
            if self.changed.wait_until(&mut log, deadline).timed_out() {
                break;
            }
        }
        drop(log);
        self.host_messages()
    }
}

impl Window for RecordingWindow {
    fn evaluate(&self, script: &str) {
        self.record(format!("eval:{script}"));
    }

    fn deliver_to_host(&self, message: &str) {
        self.record(format!("host:{message}"));
    }

    fn show(&self, seq: &str) -> Result<(), WindowError> {
        self.record(format!("show:{seq}"));
        Ok(())
    }

    fn hide(&self, seq: &str) -> Result<(), WindowError> {
        self.record(format!("hide:{seq}"));
        Ok(())
    }

    fn navigate(&self, url: &str, seq: &str) -> Result<(), WindowError> {
        self.record(format!("navigate:{seq}:{url}"));
        Ok(())
    }

    fn set_title(&self, seq: &str, title: &str) -> Result<(), WindowError> {
        self.record(format!("title:{seq}:{title}"));
        Ok(())
    }

    fn set_size(
        &self,
        seq: &str,
        width: u32,
        height: u32,
        hint: SizeHint,
    ) -> Result<(), WindowError> {
        self.record(format!("size:{seq}:{width}x{height}:{hint:?}"));
        Ok(())
    }

    fn close(&self, code: i32) -> Result<(), WindowError> {
        self.record(format!("close:{code}"));
        Ok(())
    }

    fn exit(&self, code: i32) -> Result<(), WindowError> {
        self.record(format!("exit:{code}"));
        Ok(())
    }
}
