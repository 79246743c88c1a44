//! Scheduled billing pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::app::services::AppServices;

/// Spawn the periodic billing driver.
///
/// Runs one pass every `every`, starting one interval after spawn. The
/// pass itself is infallible, so the loop has no failure path to handle;
/// a slow pass delays the next tick instead of stacking passes.
pub fn spawn_billing_scheduler(services: Arc<AppServices>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; skip that so the first pass waits a
        // full period after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let report = services.run_all().await;
            info!(
                run_id = %report.run_id,
                charged = report.charged(),
                not_charged = report.not_charged(),
                failed = report.failed(),
                "scheduled billing pass finished"
            );
        }
    })
}
