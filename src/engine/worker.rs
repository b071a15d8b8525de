use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use crate::shutdown::StopReceiver;

use super::probe::{Probe, ProbeOutcome};

/// One probe loop. Checks the stop signal at every iteration boundary and
/// otherwise fires probes back to back, counting each completed round trip.
///
/// A transport error ends this loop only; sibling loops keep running.
pub(super) async fn run_probe_loop(
    probe: Arc<dyn Probe>,
    url: String,
    mut stop_rx: StopReceiver,
    total_requests: Arc<AtomicU64>,
) {
    loop {
        // A received stop and a closed channel both mean the run is over.
        match stop_rx.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Closed | TryRecvError::Lagged(_)) => break,
        }

        match probe.probe(&url).await {
            ProbeOutcome::Success => {
                total_requests.fetch_add(1, Ordering::Relaxed);
            }
            ProbeOutcome::TransportError(message) => {
                warn!("Probe against {} failed, loop exiting: {}", url, message);
                break;
            }
        }
    }
    debug!("Probe loop for {} finished", url);
}
