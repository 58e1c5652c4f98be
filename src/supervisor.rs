//! Polling supervisor
//!
//! While a shoot is running the backend can end it on its own, for example
//! once the frame count is exhausted. The supervisor watches the store and
//! polls the backend's status only while `shooting` is true:
//!
//! - **Idle → Polling** when the store's `shooting` flag turns true. A
//!   [`PollTimer`] is acquired.
//! - **Polling → Idle** when the flag turns false, whether from a stop action
//!   or from a poll result. The timer is dropped.
//! - Dropping the [`PollingSupervisor`] cancels the task, which releases any
//!   live timer on the way out.
//!
//! Poll failures never stop polling. After `failure_threshold` consecutive
//! failures the published [`PollHealth`] is marked degraded until the next
//! successful poll.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::api::CameraApi;
use crate::config::RemoteConfig;
use crate::store::{SessionStore, StoreSnapshot};

/// Supervisor state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollPhase {
    #[default]
    Idle,
    Polling,
}

/// Polling status published for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollHealth {
    pub phase: PollPhase,
    pub consecutive_failures: u32,
    /// Set once `consecutive_failures` reaches the threshold.
    pub degraded: bool,
    pub last_error: Option<String>,
}

/// Timing and reporting settings for the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub period: Duration,
    pub failure_threshold: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from(&RemoteConfig::default())
    }
}

impl From<&RemoteConfig> for PollSettings {
    fn from(config: &RemoteConfig) -> Self {
        Self { period: config.poll_interval, failure_threshold: config.poll_failure_threshold.max(1) }
    }
}

/// The one scoped polling timer.
///
/// Counted in a shared gauge from construction until drop, so the number of
/// live timers is observable.
struct PollTimer {
    interval: Interval,
    live: Arc<AtomicUsize>,
}

impl PollTimer {
    /// First tick fires one full period after acquisition.
    fn acquire(period: Duration, live: Arc<AtomicUsize>) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        live.fetch_add(1, Ordering::SeqCst);
        Self { interval, live }
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn next_tick(timer: &mut Option<PollTimer>) {
    match timer {
        Some(timer) => {
            timer.interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Handle to the background polling task.
pub struct PollingSupervisor {
    health: watch::Receiver<PollHealth>,
    live_timers: Arc<AtomicUsize>,
    cancel: CancellationToken,
}

impl PollingSupervisor {
    /// Spawn the supervisor task for `store`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(api: Arc<dyn CameraApi>, store: Arc<SessionStore>, settings: PollSettings) -> Self {
        let (health_tx, health_rx) = watch::channel(PollHealth::default());
        let live_timers = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let task = SupervisorTask {
            api,
            store,
            settings,
            health: health_tx,
            live_timers: live_timers.clone(),
            cancel: cancel.clone(),
        };
        tokio::spawn(task.run());

        Self { health: health_rx, live_timers, cancel }
    }

    pub fn health(&self) -> PollHealth {
        self.health.borrow().clone()
    }

    pub fn phase(&self) -> PollPhase {
        self.health.borrow().phase
    }

    pub fn subscribe_health(&self) -> watch::Receiver<PollHealth> {
        self.health.clone()
    }

    /// Number of polling timers currently alive. Never more than one.
    pub fn live_timers(&self) -> usize {
        self.live_timers.load(Ordering::SeqCst)
    }

    /// Stop the supervisor task. Also happens on drop.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollingSupervisor {
    fn drop(&mut self) {
        debug!("Dropping polling supervisor");
        self.cancel.cancel();
    }
}

struct SupervisorTask {
    api: Arc<dyn CameraApi>,
    store: Arc<SessionStore>,
    settings: PollSettings,
    health: watch::Sender<PollHealth>,
    live_timers: Arc<AtomicUsize>,
    cancel: CancellationToken,
}

impl SupervisorTask {
    async fn run(self) {
        info!(period_ms = self.settings.period.as_millis() as u64, "Polling supervisor started");
        let mut state = self.store.subscribe();
        let mut timer: Option<PollTimer> = None;

        loop {
            let shooting = state.borrow_and_update().session.shooting;
            self.reconcile(shooting, &mut timer);

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("Polling supervisor cancelled");
                    break;
                }
                changed = state.changed() => {
                    if changed.is_err() {
                        debug!("Session store dropped, stopping supervisor");
                        break;
                    }
                }
                _ = next_tick(&mut timer) => {
                    if !self.poll_once(&mut state).await {
                        break;
                    }
                }
            }
        }

        drop(timer);
        self.health.send_modify(|health| health.phase = PollPhase::Idle);
        info!("Polling supervisor stopped");
    }

    /// Bring the timer in line with the shooting flag.
    fn reconcile(&self, shooting: bool, timer: &mut Option<PollTimer>) {
        match (shooting, timer.is_some()) {
            (true, false) => {
                info!("Shoot running, polling started");
                *timer = Some(PollTimer::acquire(self.settings.period, self.live_timers.clone()));
                self.health.send_replace(PollHealth { phase: PollPhase::Polling, ..PollHealth::default() });
            }
            (false, true) => {
                info!("Shoot ended, polling stopped");
                *timer = None;
                self.health.send_modify(|health| health.phase = PollPhase::Idle);
            }
            _ => {}
        }
    }

    /// Run one status poll. Returns false when cancelled mid-request.
    ///
    /// A shoot that ends while the request is in flight drops the request, so
    /// the caller reconciles the timer without waiting for the backend.
    async fn poll_once(&self, state: &mut watch::Receiver<StoreSnapshot>) -> bool {
        let snapshot = self.store.snapshot();
        let generation = snapshot.shoot_generation;
        let Some(camera) = snapshot.session.selected_camera else {
            warn!("Shooting without a selected camera, skipping poll");
            return true;
        };

        trace!(camera = %camera, generation, "Polling shoot status");
        let shoot_ended = async {
            let _ = state.wait_for(|snapshot| !snapshot.session.shooting).await;
        };
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return false,
            _ = shoot_ended => {
                debug!(camera = %camera, generation, "Shoot ended during poll, request dropped");
                return true;
            }
            result = self.api.get_status(&camera) => result,
        };

        match result {
            Ok(status) => {
                self.record_success();
                if self.store.apply_poll_result(generation, &status) {
                    info!(camera = %camera, frames_taken = ?status.frames_taken, "Backend reports shoot finished");
                }
            }
            Err(e) => self.record_failure(&e.to_string()),
        }
        true
    }

    fn record_success(&self) {
        self.health.send_if_modified(|health| {
            if health.consecutive_failures == 0 {
                return false;
            }
            if health.degraded {
                info!(after = health.consecutive_failures, "Status polling recovered");
            }
            health.consecutive_failures = 0;
            health.degraded = false;
            health.last_error = None;
            true
        });
    }

    fn record_failure(&self, message: &str) {
        let threshold = self.settings.failure_threshold;
        self.health.send_modify(|health| {
            health.consecutive_failures = health.consecutive_failures.saturating_add(1);
            health.last_error = Some(message.to_string());
            warn!(failures = health.consecutive_failures, error = %message, "Status poll failed");

            if health.consecutive_failures == threshold {
                error!(failures = threshold, error = %message, "Status polling degraded, still retrying");
                health.degraded = true;
            }
        });
    }
}
