//! # Work run by the container's lifecycle actions.
//!
//! [`Mount`] holds everything the queued work needs: the collaborators supplied at build
//! time, the props snapshot, the unit handle and the attach point the container created.
//! The handle slot is written only from inside queued work.
//!
//! Creating the owned point (queued work) and releasing it (synchronous teardown) may race;
//! both go through `OwnedPoint`, so a point created after teardown is released at once.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::error::UnitError;
use crate::events::{Bus, Event, EventKind};
use crate::unit::{AttachPoint, AttacherRef, Host, Props, UnitConfig, UnitRef, UnitStatus};

pub(super) struct Mount {
    pub(super) bus: Bus,
    pub(super) unit_config: UnitConfig,
    pub(super) attacher: Option<AttacherRef>,
    pub(super) fallback_attacher: Option<AttacherRef>,
    pub(super) attach_point: Option<AttachPoint>,
    pub(super) host: Option<Arc<dyn Host>>,
    pub(super) wrap_with: Arc<str>,
    pub(super) props: RwLock<Props>,
    pub(super) unit: Mutex<Option<UnitRef>>,
    pub(super) owned_point: Mutex<OwnedPoint>,
}

/// Attach point created through the host, plus whether teardown already released it.
#[derive(Default)]
pub(super) struct OwnedPoint {
    point: Option<AttachPoint>,
    released: bool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Mount {
    /// Begins the attach and waits for the unit to report completion.
    pub(super) async fn attach(&self) -> Result<(), UnitError> {
        let attacher = self
            .attacher
            .as_ref()
            .or(self.fallback_attacher.as_ref())
            .cloned()
            .ok_or(UnitError::MissingAttacher)?;

        let point = match &self.attach_point {
            Some(point) => point.clone(),
            None => match self.create_point()? {
                Some(point) => point,
                // Torn down while the host was creating the point; nothing to attach into.
                None => return Ok(()),
            },
        };

        let unit = attacher.begin_attach(&self.unit_config, point, self.props())?;
        *lock(&self.unit) = Some(Arc::clone(&unit));
        unit.attached().await
    }

    /// Pushes the props snapshot current at execution time, if the unit can take it.
    pub(super) async fn refresh(&self) -> Result<(), UnitError> {
        let Some(unit) = self.unit() else {
            return Ok(());
        };
        if !unit.capabilities().refresh {
            return Ok(());
        }
        let props = self.props();
        unit.refresh(&props).await
    }

    /// Detaches the unit if it exists, supports detach and is attached.
    pub(super) async fn detach(&self) -> Result<(), UnitError> {
        let Some(unit) = self.unit() else {
            return Ok(());
        };
        if !unit.capabilities().detach || unit.status() != UnitStatus::Attached {
            return Ok(());
        }
        unit.detach().await
    }

    pub(super) fn unit(&self) -> Option<UnitRef> {
        lock(&self.unit).clone()
    }

    pub(super) fn props(&self) -> Props {
        self.props
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn set_props(&self, props: Props) {
        *self.props.write().unwrap_or_else(PoisonError::into_inner) = props;
    }

    /// Creates an owned point, or returns `None` when teardown released ownership meanwhile.
    fn create_point(&self) -> Result<Option<AttachPoint>, UnitError> {
        let host = self.host.as_ref().ok_or(UnitError::MissingAttachPoint)?;
        let point = host.create_point(&self.wrap_with)?;
        self.bus.publish(Event::new(EventKind::AttachPointCreated).with_reason(point.to_string()));

        let mut slot = lock(&self.owned_point);
        if slot.released {
            drop(slot);
            self.release(host.as_ref(), &point);
            return Ok(None);
        }
        slot.point = Some(point.clone());
        Ok(Some(point))
    }

    /// Releases the attach point this container created, if any.
    ///
    /// Ownership ends here: a point whose creation is still in flight is released as soon
    /// as the host returns it.
    pub(super) fn release_owned_point(&self) {
        let point = {
            let mut slot = lock(&self.owned_point);
            slot.released = true;
            slot.point.take()
        };
        if let (Some(point), Some(host)) = (point, &self.host) {
            self.release(host.as_ref(), &point);
        }
    }

    fn release(&self, host: &dyn Host, point: &AttachPoint) {
        host.release_point(point);
        self.bus.publish(Event::new(EventKind::AttachPointReleased).with_reason(point.to_string()));
    }
}
