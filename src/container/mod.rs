//! # Container controller.
//!
//! Translates the parent's synchronous lifecycle notifications into queued actions:
//!
//! ```text
//! on_attach_requested()      ──► Attach  ──► attacher.begin_attach(..) → unit.attached()
//! on_attach_requested() again ──► dropped (reason "duplicate")
//! on_refresh_requested(p)    ──► Refresh ──► unit.refresh(p)   (if capable)
//! on_terminate_requested()   ──► terminate queue
//!                            ──► Detach  ──► unit.detach()     (if capable and attached)
//!                            ──► release owned attach point (synchronously)
//! ```
//!
//! ## Invariants
//! - The unit handle is written and used only from queued work.
//! - An attach point supplied by the parent is never released by the container.

mod builder;
mod config;
mod core;
mod mount;

pub use builder::ContainerBuilder;
pub use config::ContainerConfig;
pub use self::core::Container;
