//! Background worker draining the prefetch queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::device::DeviceState;
use crate::service::PrefetchService;

use super::events::{DispatchOutcome, LifecycleEvent, PrefetchDispatcher};

/// Default interval between periodic idle batches.
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Constraints for the periodic batch.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Roughly how often the idle batch runs.
    pub tick_interval: Duration,
    /// Periodic batches only run on unmetered wifi.
    pub require_unmetered: bool,
    /// Periodic batches only run when the battery is not low (or charging).
    pub require_battery_ok: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            require_unmetered: true,
            require_battery_ok: true,
        }
    }
}

/// Drives the prefetch queue from lifecycle events and a periodic tick.
///
/// The worker:
/// 1. Routes lifecycle events to the service recipes (pause/resume, fixed
///    enqueues)
/// 2. Runs a constraint-gated idle batch on every tick
/// 3. Drains admitted requests to the dispatcher with bounded concurrency
///    and folds the reported outcomes into the stats
pub struct PrefetchWorker<D: PrefetchDispatcher> {
    service: Arc<PrefetchService>,
    dispatcher: D,
    config: WorkerConfig,
}

impl<D: PrefetchDispatcher> PrefetchWorker<D> {
    /// Create a worker around the service and the external dispatcher.
    pub fn new(service: Arc<PrefetchService>, dispatcher: D, config: WorkerConfig) -> Self {
        Self {
            service,
            dispatcher,
            config,
        }
    }

    /// Run the worker until the channel closes or the token fires.
    pub async fn run(
        self,
        mut event_rx: mpsc::Receiver<LifecycleEvent>,
        cancellation_token: CancellationToken,
    ) {
        info!(
            tick_secs = self.config.tick_interval.as_secs(),
            require_unmetered = self.config.require_unmetered,
            "Prefetch worker started"
        );

        // First batch waits a full period; startup fetching is the
        // foreground recipe's job, not the idle tick's.
        let mut tick = tokio::time::interval_at(
            tokio::time::Instant::now() + self.config.tick_interval,
            self.config.tick_interval,
        );
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => {
                    info!("Prefetch worker shutting down");
                    break;
                }

                Some(event) = event_rx.recv() => {
                    // Events that pause the queue should not kick off fetches.
                    let drain_after = !matches!(
                        event,
                        LifecycleEvent::Background | LifecycleEvent::PowerSaveChanged(true)
                    );
                    self.service.handle_event(event);
                    if drain_after {
                        self.drain().await;
                    }
                }

                _ = tick.tick() => {
                    let device = self.service.device_state();
                    if self.constraints_met(&device) {
                        self.drain().await;
                    } else {
                        trace!(
                            network = %device.network,
                            metered = device.metered,
                            low_battery = device.low_battery,
                            "Periodic batch skipped: constraints not met"
                        );
                    }
                }
            }
        }
    }

    /// Check the periodic-batch constraints against a device snapshot.
    fn constraints_met(&self, device: &DeviceState) -> bool {
        if device.is_offline() {
            return false;
        }
        if self.config.require_unmetered && !device.unmetered_wifi() {
            return false;
        }
        if self.config.require_battery_ok && !device.battery_ok() {
            return false;
        }
        true
    }

    /// Drain the queue in batches of `max_concurrent_requests`.
    async fn drain(&self) {
        let queue = self.service.queue();
        let batch_size = self.service.config().max_concurrent_requests;
        loop {
            let batch = queue.take_batch(batch_size);
            if batch.is_empty() {
                return;
            }
            debug!(count = batch.len(), "Dispatching prefetch batch");

            let outcomes = futures::future::join_all(
                batch
                    .into_iter()
                    .map(|request| self.dispatcher.dispatch(request)),
            )
            .await;

            for outcome in outcomes {
                match outcome {
                    DispatchOutcome::Fetched { bytes } => queue.record_success(bytes),
                    DispatchOutcome::CacheHit => queue.record_cache_hit(),
                    DispatchOutcome::Failed => queue.record_failure(),
                }
            }
        }
    }
}
