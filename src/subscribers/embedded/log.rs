//! # LogWriter: event logger
//!
//! A minimal subscriber that renders incoming [`Event`]s through `tracing`.
//! Install any `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see the output.
//!
//! ## Example output
//! ```text
//! INFO  queued container="sidebar" action=attach link=1
//! INFO  starting container="sidebar" action=attach link=1
//! INFO  completed container="sidebar" action=attach link=1
//! ERROR failed container="sidebar" action=refresh link=2 err="during 'refresh', ..."
//! WARN  dropped container="sidebar" action=refresh reason="errored"
//! INFO  terminate-requested container="sidebar"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let container = e.container.as_deref().unwrap_or("unknown");
        let action = e.action.map(|a| a.as_str()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::ActionQueued => {
                tracing::info!(container, action, link = e.link, "queued");
            }
            EventKind::ActionStarting => {
                tracing::info!(container, action, link = e.link, "starting");
            }
            EventKind::ActionCompleted => {
                tracing::info!(container, action, link = e.link, "completed");
            }
            EventKind::ActionFailed => {
                tracing::error!(container, action, link = e.link, err = reason, "failed");
            }
            EventKind::FaultUnhandled => {
                tracing::error!(container, action, err = reason, "unhandled-fault");
            }
            EventKind::ActionDropped => {
                tracing::warn!(container, action, reason, "dropped");
            }
            EventKind::ActionSkipped => {
                tracing::info!(container, action, link = e.link, reason, "skipped");
            }
            EventKind::TerminateRequested => {
                tracing::info!(container, "terminate-requested");
            }
            EventKind::AttachPointCreated => {
                tracing::debug!(container, point = reason, "attach-point-created");
            }
            EventKind::AttachPointReleased => {
                tracing::debug!(container, point = reason, "attach-point-released");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(subscriber = container, reason, "subscriber-overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(subscriber = container, info = reason, "subscriber-panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
