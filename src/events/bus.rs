//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] wraps a [`tokio::sync::broadcast`] channel shared by a container, its lifecycle
//! queue and its subscriber workers. A bus obtained through [`Bus::for_container`] stamps the
//! container name on every event that does not name one already.
//!
//! ```text
//!   Container       ──┐
//!   LifecycleQueue  ──┼──► Bus ──► listener ──► SubscriberSet
//!   SubscriberSet   ──┘          └► Container::subscribe() receivers
//! ```
//!
//! Publishing never blocks and never fails: events sent while nobody listens are lost, and
//! receivers lagging more than the capacity skip the oldest events (`RecvError::Lagged`).

use std::sync::Arc;

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events. Clones share the channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
    container: Option<Arc<str>>,
}

impl Bus {
    /// Creates a new bus; `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx, container: None }
    }

    /// Returns a handle on the same channel that tags untagged events with `container`.
    pub fn for_container(&self, container: impl Into<Arc<str>>) -> Self {
        Self {
            tx: self.tx.clone(),
            container: Some(container.into()),
        }
    }

    pub fn publish(&self, ev: Event) {
        let ev = match (&self.container, &ev.container) {
            (Some(name), None) => ev.with_container(Arc::clone(name)),
            _ => ev,
        };
        let _ = self.tx.send(ev);
    }

    /// Receiver observing events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_receiver() {
        let bus = Bus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::TerminateRequested).with_container("c"));

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::TerminateRequested);
        assert_eq!(ev.container.as_deref(), Some("c"));
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::ActionQueued));
    }

    #[tokio::test]
    async fn test_container_bus_tags_untagged_events_only() {
        let root = Bus::new(8);
        let bus = root.for_container("sidebar");
        let mut rx = root.subscribe();

        bus.publish(Event::new(EventKind::TerminateRequested));
        bus.publish(Event::subscriber_panicked("log", "boom".into()));
        root.publish(Event::new(EventKind::ActionQueued));

        let tagged = rx.recv().await.expect("tagged");
        assert_eq!(tagged.container.as_deref(), Some("sidebar"));
        let own = rx.recv().await.expect("subscriber event");
        assert_eq!(own.container.as_deref(), Some("log"));
        let plain = rx.recv().await.expect("untagged");
        assert_eq!(plain.container, None);
    }
}
