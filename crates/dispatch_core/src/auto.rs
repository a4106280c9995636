//! Sharing an engine between callers, and caller-owned periodic auto-processing.
//!
//! [`SharedDispatchEngine`] puts the whole engine behind one mutex, so dequeue,
//! partner scan and partner flip in `process_next_order` form a single critical
//! section. [`AutoProcessor`] runs [`run_tick`] on a tokio interval; stopping it
//! prevents future ticks and never interrupts a tick in progress.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::engine::DispatchEngine;
use crate::error::{DispatchError, DispatchResult};
use crate::simulation::{run_tick, TickPolicy};
use crate::telemetry::DispatchStatus;

/// Cloneable handle to one engine guarded by a mutex.
#[derive(Clone)]
pub struct SharedDispatchEngine {
    inner: Arc<Mutex<DispatchEngine>>,
}

impl SharedDispatchEngine {
    pub fn new(engine: DispatchEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut DispatchEngine) -> R) -> DispatchResult<R> {
        let mut engine = self.inner.lock().map_err(|_| DispatchError::Poisoned)?;
        Ok(f(&mut *engine))
    }

    pub fn status(&self) -> DispatchResult<DispatchStatus> {
        self.with(|engine| engine.status())
    }
}

/// Handle to a running auto-processing task.
pub struct AutoProcessor {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<u64>,
}

impl AutoProcessor {
    /// Spawn the periodic task on the current tokio runtime. The first tick
    /// runs one `interval` after start. Must be called from within a runtime.
    pub fn start(engine: SharedDispatchEngine, mut policy: TickPolicy, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let interval = interval.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            let mut ticks = 0u64;
            info!(?interval, "auto-processing started");
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        match engine.with(|engine| run_tick(engine, &mut policy)) {
                            Ok(Ok(report)) => {
                                ticks += 1;
                                debug!(tick = ticks, added = ?report.added, completed = ?report.completed, "auto tick");
                            }
                            Ok(Err(err)) | Err(err) => {
                                error!(%err, "auto-processing tick failed; stopping");
                                break;
                            }
                        }
                    }
                }
            }
            info!(ticks, "auto-processing stopped");
            ticks
        });

        Self { shutdown, handle }
    }

    /// Start with the interval from the policy's config.
    pub fn start_with_config(engine: SharedDispatchEngine, policy: TickPolicy) -> Self {
        let interval = Duration::from_millis(policy.config().tick_interval_ms.max(1));
        Self::start(engine, policy, interval)
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Signal the task to stop and wait for it. Returns the number of ticks run.
    pub async fn stop(self) -> DispatchResult<u64> {
        // A send error means the task already exited.
        let _ = self.shutdown.send(true);
        self.handle
            .await
            .map_err(|err| DispatchError::AutoProcessor(err.to_string()))
    }
}
