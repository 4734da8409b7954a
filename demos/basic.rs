//! # Example: basic
//!
//! One container driving a counter unit through its whole lifecycle.
//!
//! Demonstrates how to:
//! - Implement [`EmbeddedUnit`] and hand it out through an [`AttachFn`].
//! - Let the container create (and release) its own attach point via a [`Host`].
//! - Observe every queue decision with the built-in [`LogWriter`].
//! - Watch a failing refresh get contained: later refreshes are dropped, detach still runs.
//!
//! ## Flow
//! ```text
//! on_attach_requested()     ──► Attach  ──► host.create_point("section") → begin_attach → attached
//! on_refresh_requested(p)   ──► Refresh ──► unit.refresh(p)
//! on_refresh_requested(bad) ──► Refresh ──► Err → errored, reported once
//! on_refresh_requested(p)   ──► dropped (errored)
//! on_terminate_requested()  ──► Detach  ──► unit.detach()
//!                           ──► host.release_point(..)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example basic --features logging
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mountvisor::{
    AttachFn, AttachPoint, Capabilities, Container, ContainerConfig, EmbeddedUnit, Host,
    LifecycleError, LogWriter, Props, Subscribe, UnitConfig, UnitError, UnitRef, UnitStatus,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Unit that renders a counter taken from its props.
struct Counter {
    point: AttachPoint,
    status: Mutex<UnitStatus>,
    renders: AtomicU64,
}

impl Counter {
    fn render(&self, props: &Props) -> Result<(), UnitError> {
        let value = props
            .get("count")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| UnitError::fail("props.count must be an integer"))?;
        let n = self.renders.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[counter@{}] render #{n}: {value}", self.point);
        Ok(())
    }

    fn set(&self, status: UnitStatus) {
        if let Ok(mut s) = self.status.lock() {
            *s = status;
        }
    }
}

#[async_trait]
impl EmbeddedUnit for Counter {
    fn status(&self) -> UnitStatus {
        self.status
            .lock()
            .map(|s| *s)
            .unwrap_or(UnitStatus::Faulted)
    }

    async fn attached(&self) -> Result<(), UnitError> {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        self.set(UnitStatus::Attached);
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    async fn refresh(&self, props: &Props) -> Result<(), UnitError> {
        self.render(props)
    }

    async fn detach(&self) -> Result<(), UnitError> {
        self.set(UnitStatus::Detaching);
        println!("[counter@{}] detached", self.point);
        self.set(UnitStatus::Detached);
        Ok(())
    }
}

/// Host handing out in-memory points.
struct MemoryHost;

impl Host for MemoryHost {
    fn create_point(&self, wrap_with: &str) -> Result<AttachPoint, UnitError> {
        let point = AttachPoint::new(wrap_with.to_string());
        println!("[host] created {point}");
        Ok(point)
    }

    fn release_point(&self, point: &AttachPoint) {
        println!("[host] released {point}");
    }
}

fn props(count: serde_json::Value) -> Props {
    let mut p = Props::new();
    p.insert("count".into(), count);
    p
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let attacher = AttachFn::arc(|cfg: &UnitConfig, point: AttachPoint, initial: Props| {
        println!("[attacher] starting '{}' with {:?}", cfg.name(), initial);
        let unit: UnitRef = Arc::new(Counter {
            point,
            status: Mutex::new(UnitStatus::Attaching),
            renders: AtomicU64::new(0),
        });
        Ok::<_, UnitError>(unit)
    });

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let container = Container::builder(ContainerConfig {
        wrap_with: "section".into(),
        ..ContainerConfig::named("dashboard")
    })
    .with_unit_config(UnitConfig::new("counter").with_options(json!({ "animated": false })))
    .with_attacher(attacher)
    .with_host(Arc::new(MemoryHost))
    .with_props(props(json!(0)))
    .with_error_handler(Arc::new(|err: LifecycleError| {
        println!("[parent] contained fault ({}): {err}", err.as_label());
    }))
    .with_subscribers(subs)
    .build()?;

    container.on_attach_requested();
    container.on_refresh_requested(props(json!(1)));
    container.on_refresh_requested(props(json!("not a number")));
    container.settled().await;

    // Faulted: this one is dropped at submission.
    container.on_refresh_requested(props(json!(3)));

    container.on_terminate_requested();
    container.settled().await;
    println!(
        "[parent] admission={:?} unit={:?}",
        container.admission(),
        container.unit_status()
    );

    container.shutdown().await;
    Ok(())
}
