//! # Attach points and the host that provides them.
//!
//! An [`AttachPoint`] is the opaque location a unit is attached into. It is either supplied
//! up-front by the parent, or created on demand through a [`Host`]; in the latter case the
//! container owns it and releases it on termination.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::UnitError;

static POINT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque location a unit is attached into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachPoint {
    id: u64,
    tag: Arc<str>,
}

impl AttachPoint {
    /// Creates a point with a fresh process-unique id.
    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Self {
            id: POINT_SEQ.fetch_add(1, Ordering::Relaxed),
            tag: tag.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Kind of element the point wraps (e.g. `"div"`).
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for AttachPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tag, self.id)
    }
}

/// Creates and releases attach points on behalf of a container.
pub trait Host: Send + Sync + 'static {
    /// Creates a new attach point wrapping an element of kind `wrap_with`.
    fn create_point(&self, wrap_with: &str) -> Result<AttachPoint, UnitError>;

    /// Releases a point previously returned by [`Host::create_point`].
    ///
    /// Called synchronously from [`Container::on_terminate_requested`](crate::Container::on_terminate_requested).
    fn release_point(&self, point: &AttachPoint);
}
