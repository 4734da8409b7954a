//! # Attacher trait and function-backed implementation.
//!
//! An [`Attacher`] begins attaching a unit into an [`AttachPoint`] and returns its handle
//! immediately; completion is awaited separately through [`EmbeddedUnit::attached`](crate::EmbeddedUnit::attached).
//!
//! [`AttachFn`] wraps a plain closure, mirroring how most callers just forward to an
//! existing registration function.
//!
//! ## Example
//! ```rust
//! use mountvisor::{AttachFn, AttachPoint, AttacherRef, Props, UnitConfig, UnitError, UnitRef};
//!
//! fn start(config: &UnitConfig, point: AttachPoint, _props: Props) -> Result<UnitRef, UnitError> {
//!     Err(UnitError::fail(format!("{} cannot attach into {point}", config.name())))
//! }
//!
//! let attacher: AttacherRef = AttachFn::arc(start);
//! ```

use std::sync::Arc;

use crate::error::UnitError;
use crate::unit::{AttachPoint, Props, UnitConfig, UnitRef};

/// Begins attaching embedded units.
pub trait Attacher: Send + Sync + 'static {
    /// Starts attaching the unit described by `config` into `point`.
    ///
    /// Returns the handle right away; the attach itself may still be in progress.
    fn begin_attach(
        &self,
        config: &UnitConfig,
        point: AttachPoint,
        props: Props,
    ) -> Result<UnitRef, UnitError>;
}

/// Shared reference to an attacher.
pub type AttacherRef = Arc<dyn Attacher>;

/// Function-backed attacher.
pub struct AttachFn<F> {
    f: F,
}

impl<F> AttachFn<F>
where
    F: Fn(&UnitConfig, AttachPoint, Props) -> Result<UnitRef, UnitError> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the attacher and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Attacher for AttachFn<F>
where
    F: Fn(&UnitConfig, AttachPoint, Props) -> Result<UnitRef, UnitError> + Send + Sync + 'static,
{
    fn begin_attach(
        &self,
        config: &UnitConfig,
        point: AttachPoint,
        props: Props,
    ) -> Result<UnitRef, UnitError> {
        (self.f)(config, point, props)
    }
}
