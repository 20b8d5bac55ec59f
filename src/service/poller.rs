//! Fixed-period poll loop.
//!
//! [`Poller`] ticks at the configured period and runs one
//! [`Dashboard::poll_cycle`] per tick. Ticks missed while a slow cycle was
//! running are skipped, not replayed. The loop ends when the shutdown
//! channel flips to `true` or its sender is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::dashboard::{CycleOutcome, Dashboard};

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Cycles that rendered a snapshot.
    pub applied: u64,
    /// Cycles skipped by the in-flight guard.
    pub skipped: u64,
    /// Cycles whose fetch failed.
    pub failed: u64,
}

impl PollStats {
    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Applied { .. } => self.applied += 1,
            CycleOutcome::Skipped => self.skipped += 1,
            CycleOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Cancellable poll loop driving one dashboard.
#[derive(Debug)]
pub struct Poller {
    dashboard: Arc<Dashboard>,
    period: Duration,
}

impl Poller {
    /// Creates a poller. A zero period is raised to one millisecond.
    #[must_use]
    pub fn new(dashboard: Arc<Dashboard>, period: Duration) -> Self {
        Self {
            dashboard,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Runs the loop on a new task.
    #[must_use]
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<PollStats> {
        tokio::spawn(self.run(shutdown))
    }

    /// Runs the loop until shutdown.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> PollStats {
        let mut stats = PollStats::default();
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let period_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX);
        tracing::info!(period_ms, "poll loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.dashboard.poll_cycle().await;
                    if let CycleOutcome::Failed(err) = &outcome {
                        tracing::debug!(error = %err, "poll cycle failed");
                    }
                    stats.record(&outcome);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            applied = stats.applied,
            skipped = stats.skipped,
            failed = stats.failed,
            "poll loop stopped"
        );
        stats
    }
}
