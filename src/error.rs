//! Error types used by containers, the lifecycle queue and embedded units.
//!
//! This module defines three error types:
//!
//! - [`ConfigError`]: raised synchronously while building a container, before any queue exists.
//! - [`UnitError`]: raised by the work of a single lifecycle action (unit failures, missing collaborators, panics).
//! - [`LifecycleError`]: a [`UnitError`] tagged with the action kind that was executing; this is what error handlers receive.
//!
//! All types provide `as_label` for logs/metrics; [`UnitError`] adds `as_message` for details.

use thiserror::Error;

use crate::queue::ActionKind;

/// # Errors raised while building a container.
///
/// These are caller-visible and never go through the lifecycle queue.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No unit configuration was supplied; there is nothing to attach.
    #[error(
        "container requires a unit config describing what to attach (see ContainerBuilder::with_unit_config)"
    )]
    MissingUnitConfig,

    /// The builder was used outside a Tokio runtime and no runtime handle was supplied.
    #[error("no tokio runtime available; build inside a runtime or call ContainerBuilder::with_runtime")]
    NoRuntime,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mountvisor::ConfigError;
    ///
    /// assert_eq!(ConfigError::MissingUnitConfig.as_label(), "config_missing_unit");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingUnitConfig => "config_missing_unit",
            ConfigError::NoRuntime => "config_no_runtime",
        }
    }
}

/// # Errors produced by the work of a lifecycle action.
///
/// Embedded units return [`UnitError::Fail`]; the remaining variants are produced
/// by the container and the queue itself.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// The embedded unit reported a failure.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Attach was requested but neither an explicit nor a fallback attacher is available.
    #[error("no attacher was supplied and none is available from the enclosing scope")]
    MissingAttacher,

    /// Attach was requested but neither an attach point nor a host to create one is available.
    #[error("no attach point was supplied and no host is available to create one")]
    MissingAttachPoint,

    /// The action's work panicked; the panic was caught and contained.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl UnitError {
    /// Convenience constructor for [`UnitError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        UnitError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            UnitError::Fail { .. } => "unit_failed",
            UnitError::MissingAttacher => "unit_missing_attacher",
            UnitError::MissingAttachPoint => "unit_missing_attach_point",
            UnitError::Panicked { .. } => "unit_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            UnitError::Fail { error } => format!("unit failed: {error}"),
            UnitError::MissingAttacher => "missing attacher".to_string(),
            UnitError::MissingAttachPoint => "missing attach point".to_string(),
            UnitError::Panicked { info } => format!("unit panicked: {info}"),
        }
    }
}

/// # A failure contained by the lifecycle queue.
///
/// Wraps the [`UnitError`] together with the [`ActionKind`] that was executing when it occurred.
///
/// # Example
/// ```
/// use mountvisor::{ActionKind, LifecycleError, UnitError};
///
/// let err = LifecycleError::new(ActionKind::Refresh, UnitError::fail("boom"));
/// assert_eq!(err.to_string(), "during 'refresh', embedded unit failed: boom");
/// assert_eq!(err.as_label(), "unit_failed");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("during '{action}', embedded unit failed: {source}")]
pub struct LifecycleError {
    /// Kind of the action whose work failed.
    pub action: ActionKind,
    /// The underlying failure.
    #[source]
    pub source: UnitError,
}

impl LifecycleError {
    /// Creates a new error for `action`.
    pub fn new(action: ActionKind, source: UnitError) -> Self {
        Self { action, source }
    }

    /// Returns the label of the underlying [`UnitError`].
    pub fn as_label(&self) -> &'static str {
        self.source.as_label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_error_names_action() {
        let err = LifecycleError::new(ActionKind::Attach, UnitError::MissingAttacher);
        assert_eq!(
            err.to_string(),
            "during 'attach', embedded unit failed: no attacher was supplied and none is available from the enclosing scope"
        );
        assert_eq!(err.as_label(), "unit_missing_attacher");
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error as _;

        let err = LifecycleError::new(ActionKind::Detach, UnitError::fail("gone"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("gone"));
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(ConfigError::NoRuntime.as_label(), "config_no_runtime");
        assert_eq!(
            UnitError::Panicked { info: "x".into() }.as_label(),
            "unit_panicked"
        );
        assert_eq!(UnitError::MissingAttachPoint.as_label(), "unit_missing_attach_point");
    }

    #[test]
    fn test_messages_carry_details() {
        assert_eq!(UnitError::fail("gone").as_message(), "unit failed: gone");
        assert_eq!(
            UnitError::Panicked { info: "oops".into() }.as_message(),
            "unit panicked: oops"
        );
    }
}
