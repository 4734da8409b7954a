//! # Event fan-out to the container's subscribers.
//!
//! Each subscriber gets its own bounded inbox drained by one worker task, so a slow
//! or panicking subscriber never holds up the bus listener or the other subscribers.
//!
//! ```text
//! emit(event) ──┬──► inbox ──► worker ──► LogWriter.on_event()
//!               └──► inbox ──► worker ──► Custom.on_event()   (panic → SubscriberPanicked)
//! ```
//!
//! A full inbox drops the event for that subscriber only and publishes `SubscriberOverflow`.
//! Events are delivered in order per subscriber; there is no ordering across subscribers.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// One subscriber's inbox and the task draining it.
struct Worker {
    name: &'static str,
    inbox: mpsc::Sender<Arc<Event>>,
    join: JoinHandle<()>,
}

impl Worker {
    fn spawn(sub: Arc<dyn Subscribe>, bus: Bus, runtime: &Handle) -> Self {
        let name = sub.name();
        let (inbox, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));

        let join = runtime.spawn(async move {
            while let Some(ev) = rx.recv().await {
                let delivered = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
                if let Err(payload) = delivered {
                    bus.publish(Event::subscriber_panicked(name, panic_message(payload.as_ref())));
                }
            }
        });

        Self { name, inbox, join }
    }

    /// Queues `ev` without waiting. Returns the reason when it could not be queued.
    fn offer(&self, ev: &Arc<Event>) -> Option<&'static str> {
        match self.inbox.try_send(Arc::clone(ev)) {
            Ok(()) => None,
            Err(TrySendError::Full(_)) => Some("full"),
            Err(TrySendError::Closed(_)) => Some("closed"),
        }
    }
}

/// Delivers container events to a fixed set of subscribers.
pub struct SubscriberSet {
    workers: Vec<Worker>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber on `runtime`.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus, runtime: &Handle) -> Self {
        let workers = subs
            .into_iter()
            .map(|sub| Worker::spawn(sub, bus.clone(), runtime))
            .collect();
        Self { workers, bus }
    }

    /// Hands `event` to every subscriber without blocking.
    pub fn emit(&self, event: Arc<Event>) {
        // Overflow reports that overflow themselves are not reported again.
        let report = !event.is_subscriber_overflow();
        for worker in &self.workers {
            if let Some(reason) = worker.offer(&event) {
                if report {
                    self.bus.publish(Event::subscriber_overflow(worker.name, reason));
                }
            }
        }
    }

    /// Closes every inbox and waits for the workers to drain what was already queued.
    pub async fn shutdown(self) {
        let mut joins = Vec::with_capacity(self.workers.len());
        for worker in self.workers {
            drop(worker.inbox);
            joins.push(worker.join);
        }
        for join in joins {
            let _ = join.await;
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
