//! # Queue admission state
//!
//! The queue tracks two independent, monotonic facts: the unit has **faulted** and the
//! container has been **terminated**. [`Admission`] models them as a four-state machine.
//!
//! ## Transitions
//! ```text
//!              fault()                     terminate()
//!   Normal ───────────────► Errored ───────────────────┐
//!     │                                                 ▼
//!     └──────► Terminated ─────────────────► ErroredAndTerminated
//!   terminate()             fault()
//! ```
//!
//! ## Rules
//! - No transition ever leads back towards `Normal`.
//! - `Detach` is admitted and run in every state.
//! - `Errored*`: other kinds are dropped at submission and skipped at execution.
//! - `Terminated`: other kinds are accepted at submission but skipped at execution.

use super::action::ActionKind;

/// Admission state of a lifecycle queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Admission {
    /// Every action is admitted and run.
    #[default]
    Normal,

    /// A previous action failed; only detach is admitted.
    Errored,

    /// The parent tore the container down; only detach is run.
    Terminated,

    /// Both of the above.
    ErroredAndTerminated,
}

impl Admission {
    /// Returns the state after an action failure.
    #[must_use]
    pub fn fault(self) -> Self {
        match self {
            Admission::Normal | Admission::Errored => Admission::Errored,
            Admission::Terminated | Admission::ErroredAndTerminated => {
                Admission::ErroredAndTerminated
            }
        }
    }

    /// Returns the state after the parent requested teardown.
    #[must_use]
    pub fn terminate(self) -> Self {
        match self {
            Admission::Normal | Admission::Terminated => Admission::Terminated,
            Admission::Errored | Admission::ErroredAndTerminated => {
                Admission::ErroredAndTerminated
            }
        }
    }

    #[inline]
    pub fn is_errored(self) -> bool {
        matches!(self, Admission::Errored | Admission::ErroredAndTerminated)
    }

    #[inline]
    pub fn is_terminated(self) -> bool {
        matches!(
            self,
            Admission::Terminated | Admission::ErroredAndTerminated
        )
    }

    /// Whether an action of `kind` is chained at submission time.
    #[inline]
    pub fn admits(self, kind: ActionKind) -> bool {
        kind.is_detach() || !self.is_errored()
    }

    /// Why an action of `kind` must not run when its turn arrives, if it must not.
    pub fn skip_reason(self, kind: ActionKind) -> Option<&'static str> {
        if kind.is_detach() {
            None
        } else if self.is_terminated() {
            Some("terminated")
        } else if self.is_errored() {
            Some("errored")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [ActionKind; 3] = [ActionKind::Attach, ActionKind::Refresh, ActionKind::Detach];

    #[test]
    fn test_normal_admits_and_runs_everything() {
        for kind in KINDS {
            assert!(Admission::Normal.admits(kind));
            assert_eq!(Admission::Normal.skip_reason(kind), None);
        }
    }

    #[test]
    fn test_errored_drops_all_but_detach() {
        let st = Admission::Normal.fault();
        assert_eq!(st, Admission::Errored);
        assert!(!st.admits(ActionKind::Attach));
        assert!(!st.admits(ActionKind::Refresh));
        assert!(st.admits(ActionKind::Detach));
        assert_eq!(st.skip_reason(ActionKind::Refresh), Some("errored"));
        assert_eq!(st.skip_reason(ActionKind::Detach), None);
    }

    #[test]
    fn test_terminated_admits_but_skips() {
        let st = Admission::Normal.terminate();
        assert!(st.admits(ActionKind::Refresh));
        assert_eq!(st.skip_reason(ActionKind::Refresh), Some("terminated"));
        assert_eq!(st.skip_reason(ActionKind::Attach), Some("terminated"));
        assert_eq!(st.skip_reason(ActionKind::Detach), None);
    }

    #[test]
    fn test_flags_are_monotonic() {
        let both = Admission::Normal.fault().terminate();
        assert_eq!(both, Admission::ErroredAndTerminated);
        assert_eq!(Admission::Normal.terminate().fault(), both);
        assert_eq!(both.fault(), both);
        assert_eq!(both.terminate(), both);
        assert!(both.is_errored() && both.is_terminated());
        assert_eq!(Admission::Errored.fault(), Admission::Errored);
        assert_eq!(Admission::Terminated.terminate(), Admission::Terminated);
    }
}
