//! # Runtime events emitted by containers and their lifecycle queues.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Queue events**: what the lifecycle queue decided for each action (queued, dropped, skipped, ran)
//! - **Container events**: parent-driven notifications and attach point bookkeeping
//! - **Subscriber events**: fan-out health (overflow, panics)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, container name,
//! action kind, chain position and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use mountvisor::{ActionKind, Event, EventKind};
//!
//! let ev = Event::new(EventKind::ActionFailed)
//!     .with_container("sidebar")
//!     .with_action(ActionKind::Refresh)
//!     .with_reason("boom")
//!     .with_link(3);
//!
//! assert_eq!(ev.kind, EventKind::ActionFailed);
//! assert_eq!(ev.container.as_deref(), Some("sidebar"));
//! assert_eq!(ev.action, Some(ActionKind::Refresh));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::queue::ActionKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `container`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `container`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Queue events ===
    /// Action was admitted and chained behind all previously submitted work.
    ///
    /// Sets:
    /// - `container`, `action`
    /// - `link`: position of the action in the chain (1-based, per queue)
    ActionQueued,

    /// Action was rejected at submission: the unit is faulted, or the unit was
    /// already asked to attach.
    ///
    /// Sets:
    /// - `container`, `action`
    /// - `reason`: `"errored"` or `"duplicate"`
    ActionDropped,

    /// Action reached its turn but was not run (container terminated or unit faulted).
    ///
    /// Sets:
    /// - `container`, `action`, `link`
    /// - `reason`: `"terminated"` or `"errored"`
    ActionSkipped,

    /// Action's work is about to run.
    ///
    /// Sets:
    /// - `container`, `action`, `link`
    ActionStarting,

    /// Action's work completed successfully.
    ///
    /// Sets:
    /// - `container`, `action`, `link`
    ActionCompleted,

    /// Action's work failed; the queue is now errored.
    ///
    /// Sets:
    /// - `container`, `action`, `link`
    /// - `reason`: failure message
    ActionFailed,

    /// A contained failure had no error handler and is raised to the ambient environment.
    ///
    /// Sets:
    /// - `container`, `action`
    /// - `reason`: failure message
    FaultUnhandled,

    // === Container events ===
    /// Parent requested teardown; non-detach work is suppressed from now on.
    ///
    /// Sets:
    /// - `container`
    TerminateRequested,

    /// Container created an attach point through its host.
    ///
    /// Sets:
    /// - `container`
    /// - `reason`: attach point description
    AttachPointCreated,

    /// Container released the attach point it created.
    ///
    /// Sets:
    /// - `container`
    /// - `reason`: attach point description
    AttachPointReleased,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Event classification.
    pub kind: EventKind,
    /// Name of the container (or subscriber, for subscriber events).
    pub container: Option<Arc<str>>,
    /// Lifecycle action the event refers to.
    pub action: Option<ActionKind>,
    /// Position of the action in its queue's chain.
    pub link: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            container: None,
            action: None,
            link: None,
            reason: None,
        }
    }

    /// Attaches a container name.
    #[inline]
    pub fn with_container(mut self, container: impl Into<Arc<str>>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Attaches the lifecycle action kind.
    #[inline]
    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    /// Attaches the chain position.
    #[inline]
    pub fn with_link(mut self, link: u64) -> Self {
        self.link = Some(link);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_container(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_container(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// Returns true for events that describe a failed or unhandled action.
    #[inline]
    pub fn is_fault(&self) -> bool {
        matches!(self.kind, EventKind::ActionFailed | EventKind::FaultUnhandled)
    }
}
