//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by containers, lifecycle queues
//! and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Container` (terminate, attach points), `LifecycleQueue`
//!   (every admission/skip/run decision), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the container's listener task, which fans out to its `SubscriberSet`,
//!   and anyone holding a receiver from [`Container::subscribe`](crate::Container::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
