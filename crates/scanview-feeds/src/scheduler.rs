//! Refresh scheduler: the single periodic reload timer.
//!
//! The timer is a spawned task; at most one exists at a time. Starting
//! again aborts the previous task first. The first tick fires one full
//! interval after start.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct RefreshScheduler {
    runtime: Handle,
    timer: Option<JoinHandle<()>>,
    interval: Option<Duration>,
}

impl RefreshScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime, timer: None, interval: None }
    }

    /// Call `on_tick` every `interval`, replacing any running timer.
    pub fn start<F>(&mut self, interval: Duration, on_tick: F)
    where
        F: Fn() + Send + 'static,
    {
        self.stop();
        let period = interval.max(Duration::from_millis(1));
        let handle = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tracing::debug!("refresh timer fired");
                on_tick();
            }
        });
        tracing::debug!(?period, "refresh timer started");
        self.timer = Some(handle);
        self.interval = Some(period);
    }

    /// Cancel the timer. No-op when idle.
    pub fn stop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
            tracing::debug!("refresh timer stopped");
        }
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
