//! Periodic idle-session sweep.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::services::game_flow::GameFlowService;
use crate::services::session_store::IdlePolicy;

/// Spawn the sweep on the current tokio runtime. Abort the handle to stop it.
pub fn spawn_janitor(
    flow: Arc<GameFlowService>,
    policy: IdlePolicy,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let report = flow.evict_idle(OffsetDateTime::now_utc(), policy);
            debug!(
                removed = report.removed.len(),
                forfeited = report.forfeited.len(),
                "Janitor sweep complete"
            );
        }
    })
}
