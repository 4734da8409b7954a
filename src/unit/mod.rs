//! # Embedded unit contract and its outbound collaborators.
//!
//! This module provides the interfaces the container drives:
//! - [`EmbeddedUnit`] - handle to the externally managed unit
//! - [`Attacher`] / [`AttachFn`] - begins an attach and returns the handle
//! - [`Host`] / [`AttachPoint`] - where units are attached
//! - [`UnitConfig`], [`Props`] - opaque inputs forwarded to the unit

mod attach_point;
mod attacher;
#[allow(clippy::module_inception)]
mod unit;

pub use attach_point::{AttachPoint, Host};
pub use attacher::{AttachFn, Attacher, AttacherRef};
pub use unit::{Capabilities, EmbeddedUnit, Props, UnitConfig, UnitRef, UnitStatus};
