//! # Fault reporting side channel.
//!
//! Failures never travel back to the submitter. Instead the queue hands each one to an
//! [`ErrorHandler`], or, when the host installed none, raises it as an unhandled fault:
//! an [`EventKind::FaultUnhandled`] event plus an error-level `tracing` record.

use std::sync::Arc;

use crate::error::LifecycleError;
use crate::events::{Bus, Event, EventKind};

/// Receives failures contained by a lifecycle queue.
///
/// Implemented for any `Fn(LifecycleError) + Send + Sync`.
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle_error(&self, err: LifecycleError);
}

impl<F> ErrorHandler for F
where
    F: Fn(LifecycleError) + Send + Sync + 'static,
{
    fn handle_error(&self, err: LifecycleError) {
        self(err)
    }
}

/// Routes contained failures to the handler or to the ambient environment.
#[derive(Clone)]
pub(crate) struct Reporter {
    container: Arc<str>,
    handler: Option<Arc<dyn ErrorHandler>>,
    bus: Bus,
}

impl Reporter {
    pub(crate) fn new(container: Arc<str>, handler: Option<Arc<dyn ErrorHandler>>, bus: Bus) -> Self {
        Self {
            container,
            handler,
            bus,
        }
    }

    pub(crate) fn report(&self, err: LifecycleError) {
        match &self.handler {
            Some(handler) => handler.handle_error(err),
            None => {
                tracing::error!(
                    container = &*self.container,
                    action = err.action.as_str(),
                    label = err.as_label(),
                    detail = %err.source.as_message(),
                    "unhandled lifecycle fault"
                );
                self.bus.publish(
                    Event::new(EventKind::FaultUnhandled)
                        .with_container(Arc::clone(&self.container))
                        .with_action(err.action)
                        .with_reason(err.to_string()),
                );
            }
        }
    }
}
