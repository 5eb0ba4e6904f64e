use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use scorethread_common::QuietWindow;
use scorethread_engine::Engine;

/// Fires reconciliation cycles on a fixed interval. A cycle always finishes
/// before the next tick is taken, so cycles never overlap.
pub struct Scheduler {
    interval: Duration,
    quiet: Option<QuietWindow>,
}

impl Scheduler {
    pub fn new(interval: Duration, quiet: Option<QuietWindow>) -> Self {
        Self { interval, quiet }
    }

    /// False inside the quiet window.
    pub fn should_run(&self, now: DateTime<Utc>) -> bool {
        match &self.quiet {
            Some(window) => !window.contains(now.hour()),
            None => true,
        }
    }

    /// Run cycles until `shutdown` resolves. The first cycle starts immediately.
    pub async fn run<F>(&self, engine: &Engine, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scheduler");
                    return;
                }
                _ = ticker.tick() => {
                    if !self.should_run(Utc::now()) {
                        info!("Inside quiet hours, skipping cycle");
                        continue;
                    }
                    let report = engine.run_cycle().await;
                    if report.failures.is_empty() {
                        info!("Cycle complete. {report}");
                    } else {
                        warn!(failures = report.failures.len(), "Cycle complete with failures. {report}");
                    }
                }
            }
        }
    }
}
