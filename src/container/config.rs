//! # Container configuration.
//!
//! Provides [`ContainerConfig`] plain settings shared by every container built from it.
//! Everything that identifies *what* to attach lives on the builder instead.

use std::borrow::Cow;

/// Settings for a [`Container`](crate::Container).
///
/// ## Field semantics
/// - `name`: tags every event and report produced by the container
/// - `wrap_with`: kind of attach point requested from the host when none is supplied
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct ContainerConfig {
    /// Container name used in events and fault reports.
    pub name: Cow<'static, str>,

    /// Element kind passed to [`Host::create_point`](crate::Host::create_point).
    pub wrap_with: Cow<'static, str>,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers lagging more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,
}

impl ContainerConfig {
    /// Returns a config with the given name and default settings.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ContainerConfig {
    /// Default configuration:
    ///
    /// - `name = "container"`
    /// - `wrap_with = "div"`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("container"),
            wrap_with: Cow::Borrowed("div"),
            bus_capacity: 1024,
        }
    }
}
