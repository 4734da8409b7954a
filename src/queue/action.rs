//! # Lifecycle actions.
//!
//! A [`LifecycleAction`] pairs an [`ActionKind`] with a deferred unit of work. The work is a
//! closure that *creates* its future, so nothing runs until the queue reaches the action.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;

use crate::error::UnitError;

/// Future produced by an action's work.
pub type WorkFuture = BoxFuture<'static, Result<(), UnitError>>;

type Work = Box<dyn FnOnce() -> WorkFuture + Send + 'static>;

/// Kind of lifecycle transition, used for admission decisions and error tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Attach,
    Refresh,
    Detach,
}

impl ActionKind {
    /// Returns a short stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Attach => "attach",
            ActionKind::Refresh => "refresh",
            ActionKind::Detach => "detach",
        }
    }

    /// Detach is the only kind that survives faults and termination.
    #[inline]
    pub fn is_detach(&self) -> bool {
        matches!(self, ActionKind::Detach)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named lifecycle transition waiting for its turn in the queue.
///
/// ## Example
/// ```rust
/// use mountvisor::{ActionKind, LifecycleAction, UnitError};
///
/// let action = LifecycleAction::refresh(|| async { Ok::<_, UnitError>(()) });
/// assert_eq!(action.kind(), ActionKind::Refresh);
/// ```
pub struct LifecycleAction {
    kind: ActionKind,
    work: Work,
}

impl LifecycleAction {
    /// Creates an action of `kind` whose work is produced by `f` when its turn arrives.
    pub fn new<F, Fut>(kind: ActionKind, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), UnitError>> + Send + 'static,
    {
        Self {
            kind,
            work: Box::new(move || -> WorkFuture { Box::pin(f()) }),
        }
    }

    #[inline]
    pub fn attach<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), UnitError>> + Send + 'static,
    {
        Self::new(ActionKind::Attach, f)
    }

    #[inline]
    pub fn refresh<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), UnitError>> + Send + 'static,
    {
        Self::new(ActionKind::Refresh, f)
    }

    #[inline]
    pub fn detach<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), UnitError>> + Send + 'static,
    {
        Self::new(ActionKind::Detach, f)
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Consumes the action and starts its work.
    pub(crate) fn start(self) -> WorkFuture {
        (self.work)()
    }
}

impl fmt::Debug for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleAction")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_work_is_deferred() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let action = LifecycleAction::attach(move || {
            flag.store(true, Ordering::SeqCst);
            async { Ok(()) }
        });
        assert_eq!(action.kind(), ActionKind::Attach);
        assert!(!ran.load(Ordering::SeqCst));

        drop(action.start());
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_labels() {
        assert_eq!(ActionKind::Refresh.to_string(), "refresh");
        assert!(ActionKind::Detach.is_detach());
        assert!(!ActionKind::Attach.is_detach());
    }
}
