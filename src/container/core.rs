use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::queue::{ActionKind, Admission, LifecycleAction, LifecycleQueue};
use crate::unit::{Props, UnitStatus};

use super::builder::ContainerBuilder;
use super::config::ContainerConfig;
use super::mount::Mount;

/// Background task forwarding bus events to the subscriber set.
pub(super) struct Listener {
    pub(super) token: CancellationToken,
    pub(super) join: JoinHandle<()>,
}

/// Drives one embedded unit on behalf of a parent that only issues synchronous
/// attach/refresh/terminate notifications.
///
/// Each notification becomes a [`LifecycleAction`] on the container's [`LifecycleQueue`];
/// the container itself never touches the unit outside queued work.
///
/// Dropping a container stops its subscriber listener but does **not** detach the unit;
/// call [`Container::on_terminate_requested`] first.
pub struct Container {
    pub(super) name: Arc<str>,
    pub(super) bus: Bus,
    pub(super) queue: LifecycleQueue,
    pub(super) mount: Arc<Mount>,
    pub(super) listener: Option<Listener>,
    pub(super) attach_requested: AtomicBool,
}

impl Container {
    /// Starts building a container with the given configuration.
    pub fn builder(cfg: ContainerConfig) -> ContainerBuilder {
        ContainerBuilder::new(cfg)
    }

    /// Parent attached the container: begin attaching the unit.
    ///
    /// Must be the first notification. The queued work resolves the attacher and the
    /// attach point, starts the attach, stores the handle and waits for attach completion.
    ///
    /// The unit is attached at most once: later attach notifications are dropped and
    /// published as [`EventKind::ActionDropped`] with reason `"duplicate"`.
    pub fn on_attach_requested(&self) {
        if self.attach_requested.swap(true, Ordering::SeqCst) {
            self.bus.publish(
                Event::new(EventKind::ActionDropped)
                    .with_action(ActionKind::Attach)
                    .with_reason("duplicate"),
            );
            return;
        }
        let mount = Arc::clone(&self.mount);
        self.queue
            .submit(LifecycleAction::attach(move || async move { mount.attach().await }));
    }

    /// Parent props changed: forward the new snapshot to the unit.
    ///
    /// A unit without the refresh capability (or no unit yet) makes this a no-op.
    pub fn on_refresh_requested(&self, props: Props) {
        self.mount.set_props(props);
        let mount = Arc::clone(&self.mount);
        self.queue
            .submit(LifecycleAction::refresh(move || async move { mount.refresh().await }));
    }

    /// Parent tore the container down.
    ///
    /// 1. Marks the queue terminated, so pending non-detach work is skipped
    /// 2. Queues a detach (runs only if the unit is attached)
    /// 3. Releases the attach point the container created, synchronously
    pub fn on_terminate_requested(&self) {
        self.queue.terminate();
        self.bus.publish(Event::new(EventKind::TerminateRequested));

        let mount = Arc::clone(&self.mount);
        self.queue
            .submit(LifecycleAction::detach(move || async move { mount.detach().await }));

        self.mount.release_owned_point();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current admission state of the container's queue.
    pub fn admission(&self) -> Admission {
        self.queue.admission()
    }

    /// Status of the attached unit, or `None` before the attach work obtained a handle.
    pub fn unit_status(&self) -> Option<UnitStatus> {
        self.mount.unit().map(|unit| unit.status())
    }

    /// Completes once every notification issued so far has been processed.
    pub fn settled(&self) -> impl Future<Output = ()> + Send + 'static {
        self.queue.settled()
    }

    /// Subscribes to the container's events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Returns the underlying queue.
    pub fn queue(&self) -> &LifecycleQueue {
        &self.queue
    }

    /// Waits for queued work to settle, then flushes and stops the subscriber workers.
    pub async fn shutdown(mut self) {
        self.queue.settled().await;
        if let Some(listener) = self.listener.take() {
            listener.token.cancel();
            let _ = listener.join.await;
        }
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if let Some(listener) = &self.listener {
            listener.token.cancel();
        }
    }
}
