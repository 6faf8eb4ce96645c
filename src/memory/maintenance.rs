//! Background maintenance: periodic decay-and-forget on the tokio runtime.
//!
//! Each cycle runs on the blocking pool since it walks the whole store.
//! The task stops when its [`MaintenanceHandle`] is shut down or dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::forget::ForgetReport;
use super::store::Memory;
use crate::config::MaintenanceConfig;

/// Handle to a running maintenance task.
pub struct MaintenanceHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<usize>,
}

impl MaintenanceHandle {
    /// Signal the task to stop and wait for it. Returns the number of cycles run.
    pub async fn shutdown(self) -> usize {
        let _ = self.stop.send(true);
        match self.task.await {
            Ok(cycles) => cycles,
            Err(e) => {
                warn!(error = %e, "maintenance task ended abnormally");
                0
            }
        }
    }
}

/// Spawn the periodic decay-and-forget task. Must be called inside a tokio runtime.
pub fn spawn_maintenance(memory: Arc<Memory>, config: &MaintenanceConfig) -> MaintenanceHandle {
    let period = Duration::from_millis(config.interval_ms.max(1));
    let (stop, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        let mut cycles = 0usize;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stopped.changed() => {
                    // Err: the handle was dropped.
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let mem = Arc::clone(&memory);
            match tokio::task::spawn_blocking(move || mem.decay_and_forget()).await {
                Ok(report) => {
                    cycles += 1;
                    log_cycle(&report);
                }
                Err(e) => warn!(error = %e, "maintenance cycle failed"),
            }
        }
        info!(cycles, "maintenance stopped");
        cycles
    });

    info!(interval_ms = period.as_millis() as u64, "maintenance started");
    MaintenanceHandle { stop, task }
}

fn log_cycle(report: &ForgetReport) {
    debug!(
        tick = report.tick,
        removed = report.removed,
        size = report.size_after,
        "maintenance cycle"
    );
}
