//! # mountvisor
//!
//! **Mountvisor** drives an externally managed, independently lifecycled unit
//! ("embedded unit") through attach, refresh and detach on behalf of a parent that
//! only issues synchronous notifications.
//!
//! The core is a sequential lifecycle queue: transitions are executed strictly in
//! submission order, one at a time; a failing transition is contained so the faulted
//! unit is never touched again except for a final detach; and once the parent tears
//! the container down, everything but that detach is suppressed.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      parent (sync notifications)
//!   attach │   refresh │   terminate │
//!          ▼           ▼             ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Container (controller)                                       │
//! │  - Mount (unit config, attacher, host, props, unit handle)    │
//! │  - LifecycleQueue (chain + Admission)                         │
//! └──────┬──────────────────────────────────────────────┬─────────┘
//!        │ submit(LifecycleAction)                      │
//!        ▼                                              │ publish(Event)
//! ┌────────────────────────────────────┐                ▼
//! │ link#1 ──► link#2 ──► link#3 ...   │        ┌────────────────┐
//! │ (one in flight, FIFO)              │──────► │ Bus (broadcast)│
//! └──────┬─────────────────────────────┘        └───────┬────────┘
//!        ▼                                              ▼
//!  EmbeddedUnit (attached / refresh / detach)     SubscriberSet ──► LogWriter, ...
//! ```
//!
//! ### Lifecycle
//! ```text
//! submit(action)
//!   ├─► errored && !detach  ─► ActionDropped, return
//!   └─► chain behind tail   ─► ActionQueued
//!
//! run_guarded(action)   (after the previous link settled)
//!   ├─► (terminated || errored) && !detach ─► ActionSkipped
//!   ├─► ActionStarting, run work
//!   │       ├─ Ok        ─► ActionCompleted
//!   │       └─ Err/panic ─► errored, ActionFailed,
//!   │                       report (handler or FaultUnhandled),
//!   │                       fresh resolved tail
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                               |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------------|
//! | **Container**     | Parent-facing controller translating notifications to work.  | [`Container`], [`ContainerBuilder`]              |
//! | **Queue**         | FIFO, one-at-a-time execution with failure containment.      | [`LifecycleQueue`], [`LifecycleAction`], [`Admission`] |
//! | **Unit contract** | Interfaces for the embedded unit and its collaborators.       | [`EmbeddedUnit`], [`Attacher`], [`Host`]         |
//! | **Errors**        | Typed errors for configuration and contained faults.          | [`ConfigError`], [`UnitError`], [`LifecycleError`] |
//! | **Events**        | Every decision is published for observability.                | [`Event`], [`EventKind`], [`Subscribe`]          |
//! | **Configuration** | Centralize container settings.                                | [`ContainerConfig`]                              |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber, rendering events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use async_trait::async_trait;
//! use mountvisor::{
//!     AttachFn, AttachPoint, Capabilities, Container, ContainerConfig, EmbeddedUnit, Props,
//!     UnitConfig, UnitError, UnitRef, UnitStatus,
//! };
//!
//! struct Widget {
//!     status: Mutex<UnitStatus>,
//! }
//!
//! #[async_trait]
//! impl EmbeddedUnit for Widget {
//!     fn status(&self) -> UnitStatus {
//!         *self.status.lock().unwrap()
//!     }
//!     async fn attached(&self) -> Result<(), UnitError> {
//!         *self.status.lock().unwrap() = UnitStatus::Attached;
//!         Ok(())
//!     }
//!     fn capabilities(&self) -> Capabilities {
//!         Capabilities::ALL
//!     }
//!     async fn detach(&self) -> Result<(), UnitError> {
//!         *self.status.lock().unwrap() = UnitStatus::Detached;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let attacher = AttachFn::arc(|_cfg: &UnitConfig, _point: AttachPoint, _props: Props| {
//!         let unit: UnitRef = Arc::new(Widget { status: Mutex::new(UnitStatus::Attaching) });
//!         Ok::<_, UnitError>(unit)
//!     });
//!
//!     let container = Container::builder(ContainerConfig::named("sidebar"))
//!         .with_unit_config(UnitConfig::new("widget"))
//!         .with_attacher(attacher)
//!         .with_attach_point(AttachPoint::new("div"))
//!         .build()?;
//!
//!     container.on_attach_requested();
//!     container.settled().await;
//!     assert_eq!(container.unit_status(), Some(UnitStatus::Attached));
//!
//!     container.on_terminate_requested();
//!     container.settled().await;
//!     assert_eq!(container.unit_status(), Some(UnitStatus::Detached));
//!     Ok(())
//! }
//! ```
mod container;
mod error;
mod events;
mod queue;
mod subscribers;
mod unit;

// ---- Public re-exports ----

pub use container::{Container, ContainerBuilder, ContainerConfig};
pub use error::{ConfigError, LifecycleError, UnitError};
pub use events::{Bus, Event, EventKind};
pub use queue::{ActionKind, Admission, ErrorHandler, LifecycleAction, LifecycleQueue, WorkFuture};
pub use subscribers::{Subscribe, SubscriberSet};
pub use unit::{
    AttachFn, AttachPoint, Attacher, AttacherRef, Capabilities, EmbeddedUnit, Host, Props,
    UnitConfig, UnitRef, UnitStatus,
};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
