use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::shutdown::StopReceiver;

const MONITOR_INTERVAL: Duration = Duration::from_secs(2);

/// Logs run progress every couple of seconds until the run is stopped.
pub(super) async fn run_monitor(
    started_at: Instant,
    total_requests: Arc<AtomicU64>,
    mut stop_rx: StopReceiver,
) {
    let mut tick = tokio::time::interval(MONITOR_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick fires immediately; skip it so the first report covers
    // a full interval.
    tick.tick().await;

    loop {
        tokio::select! {
            _ = stop_rx.recv() => break,
            _ = tick.tick() => {
                let total = total_requests.load(Ordering::Relaxed);
                let elapsed = started_at.elapsed().as_secs().max(1);
                info!(
                    "Job progress: {} requests ({} req/s)",
                    total,
                    total.checked_div(elapsed).unwrap_or(0)
                );
            }
        }
    }
}
