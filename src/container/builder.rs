use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::error::ConfigError;
use crate::events::Bus;
use crate::queue::{ErrorHandler, LifecycleQueue};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::unit::{AttachPoint, AttacherRef, Host, Props, UnitConfig};

use super::config::ContainerConfig;
use super::core::{Container, Listener};
use super::mount::{Mount, OwnedPoint};

/// Builder for constructing a [`Container`].
///
/// Only the unit config is required; every collaborator is injected explicitly.
pub struct ContainerBuilder {
    cfg: ContainerConfig,
    unit_config: Option<UnitConfig>,
    attacher: Option<AttacherRef>,
    fallback_attacher: Option<AttacherRef>,
    attach_point: Option<AttachPoint>,
    host: Option<Arc<dyn Host>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    props: Props,
    subscribers: Vec<Arc<dyn Subscribe>>,
    runtime: Option<Handle>,
}

impl ContainerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ContainerConfig) -> Self {
        Self {
            cfg,
            unit_config: None,
            attacher: None,
            fallback_attacher: None,
            attach_point: None,
            host: None,
            error_handler: None,
            props: Props::new(),
            subscribers: Vec::new(),
            runtime: None,
        }
    }

    /// Sets what to attach. Required.
    pub fn with_unit_config(mut self, config: UnitConfig) -> Self {
        self.unit_config = Some(config);
        self
    }

    /// Sets the attacher used to begin the attach.
    pub fn with_attacher(mut self, attacher: AttacherRef) -> Self {
        self.attacher = Some(attacher);
        self
    }

    /// Sets the attacher provided by the enclosing scope; used only when no explicit
    /// attacher was set.
    pub fn with_fallback_attacher(mut self, attacher: AttacherRef) -> Self {
        self.fallback_attacher = Some(attacher);
        self
    }

    /// Attaches into an existing point. The container never releases it.
    pub fn with_attach_point(mut self, point: AttachPoint) -> Self {
        self.attach_point = Some(point);
        self
    }

    /// Host used to create (and later release) an attach point when none was supplied.
    pub fn with_host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Receives contained faults instead of raising them as unhandled.
    pub fn with_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Initial props forwarded on attach.
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Sets event subscribers for observability.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Runtime the queue and subscriber workers run on (default: the current one).
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds the container.
    ///
    /// Fails synchronously, before any queue exists, when no unit config was given or no
    /// runtime is available.
    pub fn build(self) -> Result<Container, ConfigError> {
        let unit_config = self.unit_config.ok_or(ConfigError::MissingUnitConfig)?;
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| ConfigError::NoRuntime)?,
        };

        let name: Arc<str> = Arc::from(self.cfg.name.as_ref());
        let bus = Bus::new(self.cfg.bus_capacity_clamped()).for_container(Arc::clone(&name));
        let listener = spawn_listener(self.subscribers, &bus, &runtime);
        let queue = LifecycleQueue::new(
            Arc::clone(&name),
            bus.clone(),
            self.error_handler,
            runtime,
        );

        let mount = Arc::new(Mount {
            bus: bus.clone(),
            unit_config,
            attacher: self.attacher,
            fallback_attacher: self.fallback_attacher,
            attach_point: self.attach_point,
            host: self.host,
            wrap_with: Arc::from(self.cfg.wrap_with.as_ref()),
            props: RwLock::new(self.props),
            unit: Mutex::new(None),
            owned_point: Mutex::new(OwnedPoint::default()),
        });

        Ok(Container {
            name,
            bus,
            queue,
            mount,
            listener,
            attach_requested: AtomicBool::new(false),
        })
    }
}

/// Subscribes to the bus and forwards events to the subscriber set until cancelled.
///
/// On cancellation, events already buffered are still delivered before the workers stop.
fn spawn_listener(
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus: &Bus,
    runtime: &Handle,
) -> Option<Listener> {
    if subscribers.is_empty() {
        return None;
    }

    let set = SubscriberSet::new(subscribers, bus.clone(), runtime);
    let mut rx = bus.subscribe();
    let token = CancellationToken::new();
    let stop = token.clone();

    let join = runtime.spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(Arc::new(ev)),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
            }
        }
        while let Ok(ev) = rx.try_recv() {
            set.emit(Arc::new(ev));
        }
        set.shutdown().await;
    });

    Some(Listener { token, join })
}
