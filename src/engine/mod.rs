mod monitor;
mod probe;
mod worker;


use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, broadcast};
use tracing::info;
use url::Url;

use crate::error::EngineError;
use crate::shutdown::StopSender;

pub use probe::{HttpProbe, Probe, ProbeOutcome};

/// Engine state as reported to status callers. A run whose loops are still
/// draining after a stop already reads as idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Running {
        total_requests: u64,
        requests_per_second: u64,
    },
}

struct ActiveJob {
    started_at: Instant,
    total_requests: Arc<AtomicU64>,
    stop_tx: StopSender,
}

/// Job lifecycle engine. All mutable run state lives behind one mutex so
/// start-vs-start is an atomic check-and-set and stop/status can never
/// observe a half-started run. The request counter itself is atomic and
/// owned per run; probe loops of an old run can never touch a new run's
/// counter.
pub struct JobEngine {
    probe: Arc<dyn Probe>,
    state: Mutex<Option<ActiveJob>>,
}

impl JobEngine {
    /// Builds an engine that fires real HTTP GET probes.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(request_timeout: Duration) -> Result<Self, EngineError> {
        Ok(Self::with_probe(Arc::new(HttpProbe::new(request_timeout)?)))
    }

    /// Builds an engine around a custom probe implementation.
    pub fn with_probe(probe: Arc<dyn Probe>) -> Self {
        Self {
            probe,
            state: Mutex::new(None),
        }
    }

    /// Starts a run of `workers` concurrent probe loops against `url` and
    /// returns the number of loops spawned. Loops run detached; this call
    /// does not wait for them.
    ///
    /// An omitted worker count defaults to available parallelism.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` when a job is live, `InvalidTargetUrl` when
    /// the URL does not parse, and `InvalidWorkerCount` for an explicit
    /// count of zero.
    pub async fn start(&self, url: &str, workers: Option<usize>) -> Result<usize, EngineError> {
        Url::parse(url).map_err(|err| EngineError::InvalidTargetUrl {
            url: url.to_owned(),
            source: err,
        })?;
        let workers = match workers {
            Some(0) => return Err(EngineError::InvalidWorkerCount),
            Some(count) => count,
            None => default_worker_count(),
        };

        let mut state = self.state.lock().await;
        if state.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        let (stop_tx, _) = broadcast::channel(1);
        let total_requests = Arc::new(AtomicU64::new(0));
        let started_at = Instant::now();

        for _ in 0..workers {
            tokio::spawn(worker::run_probe_loop(
                Arc::clone(&self.probe),
                url.to_owned(),
                stop_tx.subscribe(),
                Arc::clone(&total_requests),
            ));
        }
        tokio::spawn(monitor::run_monitor(
            started_at,
            Arc::clone(&total_requests),
            stop_tx.subscribe(),
        ));

        *state = Some(ActiveJob {
            started_at,
            total_requests,
            stop_tx,
        });
        info!("Started job against {} with {} workers", url, workers);
        Ok(workers)
    }

    /// Signals every probe loop of the current run to exit at its next
    /// iteration boundary. Does not wait for the loops to drain, so a small
    /// bounded number of in-flight probes may still complete after this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns `NotRunning` when no job is live.
    pub async fn stop(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        let Some(job) = state.take() else {
            return Err(EngineError::NotRunning);
        };
        // Loops also treat the dropped sender as a stop, so a send to a run
        // with no live receivers is fine to ignore.
        drop(job.stop_tx.send(()));
        info!(
            "Stopped job after {} requests",
            job.total_requests.load(Ordering::Relaxed)
        );
        Ok(())
    }

    pub async fn status(&self) -> JobStatus {
        let state = self.state.lock().await;
        state.as_ref().map_or(JobStatus::Idle, |job| {
            let total_requests = job.total_requests.load(Ordering::Relaxed);
            // Clamp elapsed time so a status poll in the same second as the
            // start never divides by zero.
            let elapsed = job.started_at.elapsed().as_secs().max(1);
            JobStatus::Running {
                total_requests,
                requests_per_second: total_requests.checked_div(elapsed).unwrap_or(0),
            }
        })
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
