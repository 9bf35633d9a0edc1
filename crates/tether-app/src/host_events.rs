//! Host-side observer of bridge traffic.
//!
//! Every completion the bridge resolves is also delivered to the host as an
//! `ipc://resolve?...` message, which the window publishes on the event bus.
//! This listener logs them along with the window lifecycle events.

use tether_bridge::resolver::RESOLVE_COMMAND;
use tether_bridge::{Command, State};
use tether_common::{Event, EventBus};
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A decoded `resolve` host message.
#[derive(Debug, PartialEq, Eq)]
pub struct Resolution {
    pub seq: String,
    pub state: State,
    pub value: String,
    pub post: Option<String>,
}

pub fn parse_resolution(message: &str) -> Option<Resolution> {
    let command = Command::parse(message).ok()?;
    if command.name() != RESOLVE_COMMAND {
        return None;
    }
    Some(Resolution {
        seq: command.seq().unwrap_or_default().to_string(),
        state: command.get_as("state")?,
        value: command.get("value").unwrap_or_default().to_string(),
        post: command.get("post").map(str::to_string),
    })
}

/// The task ends on [`Event::Shutdown`] or once every publisher is gone.
pub fn spawn_listener(runtime: &Handle, bus: &EventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    runtime.spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::HostMessage(message)) => match parse_resolution(&message) {
                    Some(r) => debug!(
                        seq = %r.seq,
                        state = ?r.state,
                        value_len = r.value.len(),
                        post = r.post.as_deref().unwrap_or(""),
                        "host resolution"
                    ),
                    None => debug!(message = %message, "host message"),
                },
                Ok(Event::WindowClosed { code }) => info!(code, "window closed"),
                Ok(Event::Shutdown) => {
                    info!("shutdown requested");
                    break;
                }
                Ok(other) => debug!(event = ?other, "window event"),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "host listener fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_render_resolution() {
        let r = parse_resolution("ipc://resolve?seq=R42&state=0&value=hello").unwrap();
        assert_eq!(
            r,
            Resolution {
                seq: "R42".into(),
                state: State::Success,
                value: "hello".into(),
                post: None,
            }
        );
    }

    #[test]
    fn parses_failure_with_post() {
        let r = parse_resolution("ipc://resolve?seq=7&state=1&value=a%20b&post=abc").unwrap();
        assert_eq!(r.state, State::Failure);
        assert_eq!(r.value, "a b");
        assert_eq!(r.post.as_deref(), Some("abc"));
    }

    #[test]
    fn ignores_other_messages() {
        assert!(parse_resolution("ipc://other?seq=1").is_none());
        assert!(parse_resolution("").is_none());
        assert!(parse_resolution("ipc://resolve?seq=1&state=maybe").is_none());
    }

    #[tokio::test]
    async fn listener_survives_traffic_and_stops_on_shutdown() {
        let bus = EventBus::new(8);
        let handle = spawn_listener(&Handle::current(), &bus);

        bus.publish(Event::HostMessage("ipc://resolve?seq=R1&state=0&value=x".into()));
        bus.publish(Event::HostMessage("not a command =".into()));
        bus.publish(Event::WindowShown);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        bus.publish(Event::Shutdown);
        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn listener_stops_when_bus_is_dropped() {
        let bus = EventBus::new(8);
        let handle = spawn_listener(&Handle::current(), &bus);
        drop(bus);
        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }
}
