//! Broadcast channel for UI events.
//!
//! [`UiEventBus`] wraps a [`tokio::sync::broadcast`] channel. Failed
//! requests publish a [`Notice`], applied snapshots publish
//! [`UiEvent::Rendered`], and every front end subscribes to the bus.

use tokio::sync::broadcast;

use super::{Notice, NoticeLevel, UiEvent};

/// Broadcast bus for [`UiEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity
/// (default 1 024). When the ring buffer is full, the oldest events are
/// dropped for lagging receivers.
#[derive(Debug, Clone)]
pub struct UiEventBus {
    sender: broadcast::Sender<UiEvent>,
}

impl UiEventBus {
    /// Creates a new `UiEventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: UiEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Publishes a notice, logging it as well so headless runs keep a trace.
    /// Failures log at `warn`, informational notices at `info`.
    pub fn notify(&self, notice: Notice) -> usize {
        match notice.level {
            NoticeLevel::Error => {
                tracing::warn!(notice_id = %notice.id, message = %notice.message, "user notice");
            }
            NoticeLevel::Info => {
                tracing::info!(notice_id = %notice.id, message = %notice.message, "user notice");
            }
        }
        self.publish(UiEvent::Notice(notice))
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Ok(mut out) = self.0.lock() {
                out.extend_from_slice(buf);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged(notice: Notice) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            UiEventBus::new(4).notify(notice);
        });
        let Ok(bytes) = captured.0.lock() else {
            panic!("capture lock poisoned");
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn notice_level_picks_log_level() {
        let info = logged(Notice::info("No files found."));
        assert!(info.contains("INFO"), "{info}");
        assert!(!info.contains("WARN"), "{info}");

        let failure = logged(Notice::failure(
            "/api/event_list",
            &DashboardError::Payload("not a list".to_string()),
        ));
        assert!(failure.contains("WARN"), "{failure}");
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = UiEventBus::new(16);
        assert_eq!(bus.notify(Notice::info("nobody listens")), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_notice() {
        let bus = UiEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.notify(Notice::info("saved"));

        let Ok(UiEvent::Notice(notice)) = rx.recv().await else {
            panic!("expected a notice");
        };
        assert_eq!(notice.message, "saved");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = UiEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let count = bus.notify(Notice::info("both"));
        assert_eq!(count, 2);

        let Ok(UiEvent::Notice(a)) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(UiEvent::Notice(b)) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = UiEventBus::new(16);
        assert_eq!(bus.receiver_count(), 0);

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = UiEventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.notify(Notice::info("ok")), 1);
    }
}
