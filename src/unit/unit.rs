//! # Embedded unit contract.
//!
//! An embedded unit is an independently lifecycled piece of software attached inside a
//! container. The crate never implements one; it only drives the [`EmbeddedUnit`] handle
//! it receives from an [`Attacher`](crate::Attacher).
//!
//! ## Lifecycle
//! ```text
//! Unattached ──► Attaching ──► Attached ──► Detaching ──► Detached
//!      │             │            │             │
//!      └─────────────┴────────────┴─────────────┴──► Faulted (detach still attempted)
//! ```
//!
//! Refresh and detach are **optional** capabilities, advertised through [`Capabilities`].
//! A unit without a capability is never asked to perform it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::UnitError;

/// Properties forwarded to the unit on attach and refresh.
pub type Props = Map<String, Value>;

/// Shared reference to an embedded unit handle.
pub type UnitRef = Arc<dyn EmbeddedUnit>;

/// Status reported by an embedded unit.
///
/// The status is owned by the unit: the container only reads it (through
/// [`Container::unit_status`](crate::Container::unit_status)) and never writes it. A failing
/// transition does not change it by itself; the container-side fault is tracked separately
/// as [`Admission`](crate::Admission).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Unattached,
    Attaching,
    Attached,
    Detaching,
    Detached,
    /// The unit itself reports that a transition failed (e.g. its attach was rejected).
    ///
    /// Detach work skips a unit in this state, since it is not attached.
    Faulted,
}

impl UnitStatus {
    /// Returns a short stable label (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Unattached => "unattached",
            UnitStatus::Attaching => "attaching",
            UnitStatus::Attached => "attached",
            UnitStatus::Detaching => "detaching",
            UnitStatus::Detached => "detached",
            UnitStatus::Faulted => "faulted",
        }
    }
}

/// Optional operations a unit supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Unit accepts [`EmbeddedUnit::refresh`].
    pub refresh: bool,
    /// Unit accepts [`EmbeddedUnit::detach`].
    pub detach: bool,
}

impl Capabilities {
    /// No optional operations.
    pub const NONE: Self = Self {
        refresh: false,
        detach: false,
    };
    /// Both refresh and detach.
    pub const ALL: Self = Self {
        refresh: true,
        detach: true,
    };
}

/// Opaque description of what to attach.
///
/// The container never inspects `options`; it hands the whole config to the attacher.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitConfig {
    name: Arc<str>,
    options: Value,
}

impl UnitConfig {
    /// Creates a config identified by `name` with no options.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            options: Value::Null,
        }
    }

    /// Returns a new config with the given options.
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Value {
        &self.options
    }
}

/// # Handle to an attached (or attaching) embedded unit.
///
/// Every method is invoked from inside the lifecycle queue, so at most one of them is in
/// flight at any instant.
///
/// # Example
/// ```
/// use std::sync::Mutex;
/// use async_trait::async_trait;
/// use mountvisor::{Capabilities, EmbeddedUnit, Props, UnitError, UnitStatus};
///
/// struct Widget {
///     status: Mutex<UnitStatus>,
/// }
///
/// #[async_trait]
/// impl EmbeddedUnit for Widget {
///     fn status(&self) -> UnitStatus {
///         *self.status.lock().unwrap()
///     }
///
///     async fn attached(&self) -> Result<(), UnitError> {
///         *self.status.lock().unwrap() = UnitStatus::Attached;
///         Ok(())
///     }
///
///     fn capabilities(&self) -> Capabilities {
///         Capabilities { refresh: false, detach: true }
///     }
///
///     async fn detach(&self) -> Result<(), UnitError> {
///         *self.status.lock().unwrap() = UnitStatus::Detached;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EmbeddedUnit: Send + Sync + 'static {
    /// Returns the unit's current status.
    fn status(&self) -> UnitStatus;

    /// Completes once the attach started by the attacher has finished.
    async fn attached(&self) -> Result<(), UnitError>;

    /// Optional operations supported by this unit.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// Pushes a new props snapshot to the unit. Only called when `capabilities().refresh`.
    async fn refresh(&self, _props: &Props) -> Result<(), UnitError> {
        Ok(())
    }

    /// Detaches the unit. Only called when `capabilities().detach` and the unit reports
    /// [`UnitStatus::Attached`].
    async fn detach(&self) -> Result<(), UnitError> {
        Ok(())
    }
}
