//! # Sequential lifecycle queue.
//!
//! [`LifecycleQueue`] serializes lifecycle actions against a single embedded unit.
//! Submissions arrive synchronously at arbitrary times; each one is chained behind
//! everything submitted before it, so at most one action's work is in flight.
//!
//! ## Chain
//! ```text
//! submit(a1)  submit(a2)  submit(a3)
//!     │           │           │
//!     ▼           ▼           ▼
//! resolved ──► link#1 ──► link#2 ──► link#3   (pending = link#3)
//!               │           │           │
//!          run_guarded  run_guarded  run_guarded
//! ```
//! Every link is a [`Shared`] future that always resolves to `()`: a failing action turns
//! its error into queue state before its link settles, so later links continue on both the
//! success and the failure path and never observe a rejected predecessor.
//!
//! ## Admission
//! - **At submission**: a non-detach action is dropped once the queue is errored.
//! - **At execution**: a non-detach action is skipped once the queue is terminated or errored
//!   (it may have been accepted before either happened).
//! - Detach is always admitted and always run.
//!
//! ## Failure containment
//! On failure (error or panic) the queue:
//! 1. moves to an errored state (never reset),
//! 2. publishes [`EventKind::ActionFailed`],
//! 3. reports the failure through the error handler (or as an unhandled fault),
//! 4. starts a fresh resolved link if the failing one is still the tail.
//!
//! ## Rules
//! - Actions run in submission order, one at a time, with no timeout and no cancellation.
//! - `submit` never blocks and never returns the action's outcome.
//! - Links are spawned on the runtime handle captured at construction, so `submit` may be
//!   called from threads outside the runtime.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::runtime::Handle;

use crate::error::{LifecycleError, UnitError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::panic_message;

use super::action::{ActionKind, LifecycleAction};
use super::admission::Admission;
use super::report::{ErrorHandler, Reporter};

type Link = Shared<BoxFuture<'static, ()>>;

fn resolved() -> Link {
    futures::future::ready(()).boxed().shared()
}

/// Mutable queue state, guarded by a short-lived lock that is never held across an await.
struct QueueState {
    /// Tail of the chain.
    pending: Link,
    /// Number of links created so far; doubles as the id of the tail link.
    links: u64,
    admission: Admission,
}

struct Inner {
    container: Arc<str>,
    state: Mutex<QueueState>,
    bus: Bus,
    reporter: Reporter,
    runtime: Handle,
}

/// Serializes lifecycle actions for one embedded unit.
///
/// Cheap to clone; clones share the same chain and state.
#[derive(Clone)]
pub struct LifecycleQueue {
    inner: Arc<Inner>,
}

impl LifecycleQueue {
    /// Creates an empty queue.
    ///
    /// ### Parameters
    /// - `container`: name used to tag events and reports
    /// - `bus`: where every admission/execution decision is published
    /// - `handler`: receives every contained fault (`None` = raise as unhandled fault)
    /// - `runtime`: runtime the chain's links are spawned on
    pub fn new(
        container: impl Into<Arc<str>>,
        bus: Bus,
        handler: Option<Arc<dyn ErrorHandler>>,
        runtime: Handle,
    ) -> Self {
        let container = container.into();
        let reporter = Reporter::new(Arc::clone(&container), handler, bus.clone());
        Self {
            inner: Arc::new(Inner {
                container,
                state: Mutex::new(QueueState {
                    pending: resolved(),
                    links: 0,
                    admission: Admission::Normal,
                }),
                bus,
                reporter,
                runtime,
            }),
        }
    }

    /// Submits an action (fire-and-forget).
    ///
    /// The action is either dropped right away (queue errored, action is not a detach) or
    /// chained behind all earlier submissions.
    pub fn submit(&self, action: LifecycleAction) {
        let kind = action.kind();
        let mut state = self.inner.lock_state();

        if !state.admission.admits(kind) {
            drop(state);
            self.inner.publish(
                Event::new(EventKind::ActionDropped)
                    .with_action(kind)
                    .with_reason("errored"),
            );
            return;
        }

        state.links += 1;
        let link = state.links;
        let prev = state.pending.clone();
        let inner = Arc::clone(&self.inner);
        let next: Link = async move {
            prev.await;
            inner.run_guarded(link, action).await;
        }
        .boxed()
        .shared();
        state.pending = next.clone();

        self.inner.publish(
            Event::new(EventKind::ActionQueued)
                .with_action(kind)
                .with_link(link),
        );
        drop(state);

        self.inner.runtime.spawn(next);
    }

    /// Marks the queue terminated: from now on only detach actions run.
    pub fn terminate(&self) {
        let mut state = self.inner.lock_state();
        state.admission = state.admission.terminate();
    }

    /// Current admission state.
    pub fn admission(&self) -> Admission {
        self.inner.lock_state().admission
    }

    pub fn is_errored(&self) -> bool {
        self.admission().is_errored()
    }

    pub fn is_terminated(&self) -> bool {
        self.admission().is_terminated()
    }

    /// Completes once every action submitted so far has settled.
    pub fn settled(&self) -> impl Future<Output = ()> + Send + 'static {
        self.inner.lock_state().pending.clone()
    }

    /// Name used to tag events.
    pub fn container(&self) -> &str {
        &self.inner.container
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_container(Arc::clone(&self.container)));
    }

    /// Runs one action once every earlier link has settled.
    async fn run_guarded(&self, link: u64, action: LifecycleAction) {
        let kind = action.kind();
        let admission = self.lock_state().admission;

        if let Some(reason) = admission.skip_reason(kind) {
            self.publish(
                Event::new(EventKind::ActionSkipped)
                    .with_action(kind)
                    .with_link(link)
                    .with_reason(reason),
            );
            return;
        }

        self.publish(
            Event::new(EventKind::ActionStarting)
                .with_action(kind)
                .with_link(link),
        );

        let res = match AssertUnwindSafe(async move { action.start().await })
            .catch_unwind()
            .await
        {
            Ok(res) => res,
            Err(panic_err) => Err(UnitError::Panicked {
                info: panic_message(panic_err.as_ref()),
            }),
        };

        match res {
            Ok(()) => self.publish(
                Event::new(EventKind::ActionCompleted)
                    .with_action(kind)
                    .with_link(link),
            ),
            Err(err) => self.fail(link, LifecycleError::new(kind, err)),
        }
    }

    fn fail(&self, link: u64, err: LifecycleError) {
        {
            let mut state = self.lock_state();
            state.admission = state.admission.fault();
        }

        self.publish(
            Event::new(EventKind::ActionFailed)
                .with_action(err.action)
                .with_link(link)
                .with_reason(err.to_string()),
        );
        self.reporter.report(err);

        let mut state = self.lock_state();
        if state.links == link {
            state.pending = resolved();
        }
    }
}
