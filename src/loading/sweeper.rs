//! Periodic staleness sweep
//!
//! The store never schedules itself. [`StalenessSweeper`] owns the timer
//! and calls [`LoadingStore::reset_stuck_loading_states`] on every tick,
//! which bounds how long any page can appear to be loading.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::page::Page;
use super::store::LoadingStore;

/// Default time between sweeps
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

/// Timer-driven reconciliation pass over a [`LoadingStore`]
#[derive(Debug, Clone)]
pub struct StalenessSweeper {
    store: LoadingStore,
    interval: Duration,
}

impl StalenessSweeper {
    pub fn new(store: LoadingStore, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub fn with_default_interval(store: LoadingStore) -> Self {
        Self::new(store, Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single sweep
    pub fn sweep_once(&self) -> Vec<Page> {
        let reset = self.store.reset_stuck_loading_states();
        if !reset.is_empty() {
            tracing::info!(count = reset.len(), "Staleness sweep reset stuck pages");
        }
        reset
    }

    /// Sweep forever on a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run_until(std::future::pending::<()>()).await;
        })
    }

    /// Sweep on every tick until `shutdown` resolves
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            timeout_ms = self.store.stuck_timeout().num_milliseconds(),
            "Staleness sweeper started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    self.sweep_once();
                }
            }
        }

        tracing::info!("Staleness sweeper stopped");
    }
}
