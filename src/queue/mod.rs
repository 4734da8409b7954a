//! # Lifecycle queue.
//!
//! This module provides the serialization core:
//! - [`LifecycleQueue`] - strict FIFO, one action in flight, failure containment
//! - [`LifecycleAction`] / [`ActionKind`] - named units of deferred work
//! - [`Admission`] - errored/terminated state deciding what is dropped or skipped
//! - [`ErrorHandler`] - side channel receiving contained faults

mod action;
mod admission;
#[allow(clippy::module_inception)]
mod queue;
mod report;

pub use action::{ActionKind, LifecycleAction, WorkFuture};
pub use admission::Admission;
pub use queue::LifecycleQueue;
pub use report::ErrorHandler;
