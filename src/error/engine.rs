use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Job is already running.")]
    AlreadyRunning,
    #[error("Job is not running.")]
    NotRunning,
    #[error("Invalid target URL '{url}': {source}")]
    InvalidTargetUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Worker count must be >= 1.")]
    InvalidWorkerCount,
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
}
