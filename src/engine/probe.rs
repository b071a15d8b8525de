use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::EngineError;

/// Outcome of one probe round trip. Any received response counts as a
/// success regardless of status code; only transport-level failures (DNS,
/// connect, timeout) are errors.
#[derive(Debug)]
pub enum ProbeOutcome {
    Success,
    TransportError(String),
}

/// A single-shot request against the target URL. The engine drives this in
/// its probe loops; tests substitute deterministic implementations.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// Probe firing real HTTP GETs through a pooled `reqwest` client with a
/// bounded per-request timeout.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(request_timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| EngineError::BuildClient { source: err })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(response) => {
                // Drain the body so the connection goes back to the pool.
                drop(response.bytes().await);
                ProbeOutcome::Success
            }
            Err(err) => ProbeOutcome::TransportError(err.to_string()),
        }
    }
}
