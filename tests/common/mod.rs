//! Fake units and collaborators shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use async_trait::async_trait;
use mountvisor::{
    AttachFn, AttachPoint, AttacherRef, Capabilities, EmbeddedUnit, Host, LifecycleError, Props,
    UnitConfig, UnitError, UnitRef, UnitStatus,
};
use tokio::sync::Notify;

/// Observable state of a [`FakeUnit`], kept alive after the container drops the handle.
#[derive(Default)]
pub struct Recorder {
    pub status: Mutex<Option<UnitStatus>>,
    pub attaches: AtomicUsize,
    pub refreshes: AtomicUsize,
    pub detaches: AtomicUsize,
    pub last_props: Mutex<Option<Props>>,
    pub attached_into: Mutex<Option<AttachPoint>>,
    pub config_name: Mutex<Option<String>>,
}

impl Recorder {
    pub fn status(&self) -> Option<UnitStatus> {
        *self.status.lock().unwrap()
    }
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
    pub fn detaches(&self) -> usize {
        self.detaches.load(Ordering::SeqCst)
    }
    pub fn attaches(&self) -> usize {
        self.attaches.load(Ordering::SeqCst)
    }
}

/// Knobs controlling how a [`FakeUnit`] behaves.
#[derive(Clone, Default)]
pub struct Behavior {
    pub capabilities: Option<Capabilities>,
    pub fail_attach: bool,
    pub fail_refresh: bool,
    pub fail_detach: bool,
    /// When set, attach completion waits for a notification.
    pub attach_gate: Option<Arc<Notify>>,
}

pub struct FakeUnit {
    recorder: Arc<Recorder>,
    behavior: Behavior,
}

impl FakeUnit {
    fn set_status(&self, status: UnitStatus) {
        *self.recorder.status.lock().unwrap() = Some(status);
    }
}

#[async_trait]
impl EmbeddedUnit for FakeUnit {
    fn status(&self) -> UnitStatus {
        self.recorder.status().unwrap_or(UnitStatus::Unattached)
    }

    async fn attached(&self) -> Result<(), UnitError> {
        if let Some(gate) = &self.behavior.attach_gate {
            gate.notified().await;
        }
        if self.behavior.fail_attach {
            self.set_status(UnitStatus::Faulted);
            return Err(UnitError::fail("attach rejected"));
        }
        self.set_status(UnitStatus::Attached);
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        self.behavior.capabilities.unwrap_or(Capabilities::ALL)
    }

    async fn refresh(&self, props: &Props) -> Result<(), UnitError> {
        self.recorder.refreshes.fetch_add(1, Ordering::SeqCst);
        *self.recorder.last_props.lock().unwrap() = Some(props.clone());
        if self.behavior.fail_refresh {
            return Err(UnitError::fail("refresh exploded"));
        }
        Ok(())
    }

    async fn detach(&self) -> Result<(), UnitError> {
        self.recorder.detaches.fetch_add(1, Ordering::SeqCst);
        self.set_status(UnitStatus::Detaching);
        if self.behavior.fail_detach {
            return Err(UnitError::fail("detach exploded"));
        }
        self.set_status(UnitStatus::Detached);
        Ok(())
    }
}

/// Attacher producing [`FakeUnit`]s that report into `recorder`.
pub fn attacher(recorder: Arc<Recorder>, behavior: Behavior) -> AttacherRef {
    AttachFn::arc(move |config: &UnitConfig, point: AttachPoint, props: Props| {
        recorder.attaches.fetch_add(1, Ordering::SeqCst);
        *recorder.status.lock().unwrap() = Some(UnitStatus::Attaching);
        *recorder.attached_into.lock().unwrap() = Some(point);
        *recorder.last_props.lock().unwrap() = Some(props);
        *recorder.config_name.lock().unwrap() = Some(config.name().to_string());
        let unit: UnitRef = Arc::new(FakeUnit {
            recorder: Arc::clone(&recorder),
            behavior: behavior.clone(),
        });
        Ok::<_, UnitError>(unit)
    })
}

/// Host recording created and released points.
#[derive(Default)]
pub struct FakeHost {
    pub created: Mutex<Vec<AttachPoint>>,
    pub released: Mutex<Vec<AttachPoint>>,
}

impl Host for FakeHost {
    fn create_point(&self, wrap_with: &str) -> Result<AttachPoint, UnitError> {
        let point = AttachPoint::new(wrap_with.to_string());
        self.created.lock().unwrap().push(point.clone());
        Ok(point)
    }

    fn release_point(&self, point: &AttachPoint) {
        self.released.lock().unwrap().push(point.clone());
    }
}

/// Error handler collecting every reported fault.
pub fn collector() -> (Arc<Mutex<Vec<LifecycleError>>>, Arc<dyn mountvisor::ErrorHandler>) {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let handler: Arc<dyn mountvisor::ErrorHandler> = Arc::new(move |err: LifecycleError| {
        sink.lock().unwrap().push(err);
    });
    (errors, handler)
}

/// Host whose `create_point` parks until the test lets it continue.
///
/// `entered` is reached once the host was called; `proceed` releases it.
pub struct GatedHost {
    pub inner: FakeHost,
    pub entered: Barrier,
    pub proceed: Barrier,
}

impl Default for GatedHost {
    fn default() -> Self {
        Self {
            inner: FakeHost::default(),
            entered: Barrier::new(2),
            proceed: Barrier::new(2),
        }
    }
}

impl Host for GatedHost {
    fn create_point(&self, wrap_with: &str) -> Result<AttachPoint, UnitError> {
        self.entered.wait();
        self.proceed.wait();
        self.inner.create_point(wrap_with)
    }

    fn release_point(&self, point: &AttachPoint) {
        self.inner.release_point(point);
    }
}
