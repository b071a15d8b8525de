use std::net::SocketAddr;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tracing::{debug, error};

use crate::config::ConfigStore;
use crate::engine::{JobEngine, JobStatus};
use crate::error::{ConfigError, EngineError, RegistryError};
use crate::registry::WorkerRegistry;

use super::http::{HttpRequest, RequestError, read_request, write_json};

/// Everything the control routes need, shared across connection tasks.
pub struct ServerState {
    pub engine: JobEngine,
    pub registry: WorkerRegistry,
    pub config: ConfigStore,
}

#[derive(Debug, Deserialize)]
struct StartJobRequest {
    url: String,
    workers: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    key: String,
}

#[derive(Debug, Deserialize)]
struct QuickStartRequest {
    admin: String,
    password: String,
}

pub(super) async fn handle_connection(
    mut socket: TcpStream,
    peer: SocketAddr,
    state: Arc<ServerState>,
) {
    let request = match read_request(&mut socket).await {
        Ok(request) => request,
        Err(err) => {
            respond(&mut socket, err.status, &json!({ "message": err.message })).await;
            return;
        }
    };
    debug!("{} {} from {}", request.method, request.path, peer);

    let (status, body) = route(&request, peer, &state).await;
    respond(&mut socket, status, &body).await;
}

async fn route(request: &HttpRequest, peer: SocketAddr, state: &ServerState) -> (u16, Value) {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/new-job") => start_job(request, state).await,
        ("GET", "/stop-job") => stop_job(state).await,
        ("GET", "/job-status") => job_status(state).await,
        ("POST", "/register-worker") => register_worker(request, peer, state).await,
        ("GET", "/health-check") => (200, json!({ "message": "pong" })),
        ("POST", "/quick-start") => quick_start(request, state).await,
        _ => (404, json!({ "message": "not found" })),
    }
}

async fn start_job(request: &HttpRequest, state: &ServerState) -> (u16, Value) {
    let start = match parse_body::<StartJobRequest>(request) {
        Ok(start) => start,
        Err(err) => return (err.status, json!({ "message": err.message })),
    };

    match state.engine.start(&start.url, start.workers).await {
        Ok(_) => (200, json!({ "message": "new job started" })),
        // Mirrors the original wire behavior: a busy engine answers 200
        // with an informational message, not an error status.
        Err(EngineError::AlreadyRunning) => (200, json!({ "message": "Job is already running" })),
        Err(
            err @ (EngineError::InvalidTargetUrl { .. } | EngineError::InvalidWorkerCount),
        ) => (400, json!({ "message": err.to_string() })),
        Err(err @ (EngineError::NotRunning | EngineError::BuildClient { .. })) => {
            error!("Unexpected start failure: {}", err);
            (500, json!({ "message": "internal error" }))
        }
    }
}

async fn stop_job(state: &ServerState) -> (u16, Value) {
    match state.engine.stop().await {
        Ok(()) => (200, json!({ "message": "job stopped" })),
        Err(EngineError::NotRunning) => (200, json!({ "message": "job is not running" })),
        Err(
            err @ (EngineError::AlreadyRunning
            | EngineError::InvalidTargetUrl { .. }
            | EngineError::InvalidWorkerCount
            | EngineError::BuildClient { .. }),
        ) => {
            error!("Unexpected stop failure: {}", err);
            (500, json!({ "message": "internal error" }))
        }
    }
}

async fn job_status(state: &ServerState) -> (u16, Value) {
    match state.engine.status().await {
        JobStatus::Running {
            total_requests,
            requests_per_second,
        } => (
            200,
            json!({
                "message": "job is running",
                "total_requests": total_requests,
                "requests_per_second": requests_per_second,
            }),
        ),
        JobStatus::Idle => (200, json!({ "message": "job is not running" })),
    }
}

async fn register_worker(
    request: &HttpRequest,
    peer: SocketAddr,
    state: &ServerState,
) -> (u16, Value) {
    let register = match parse_body::<RegisterRequest>(request) {
        Ok(register) => register,
        Err(err) => return (err.status, json!({ "message": err.message })),
    };

    // Before quick-start there is no secret to match, so every key is wrong.
    let Some(config) = state.config.get().await else {
        return (401, json!({ "message": "wrong key" }));
    };
    let secret = config.shared_secret();
    let address = peer.ip().to_string();

    match state.registry.register(&secret, &register.key, &address).await {
        Ok(record) => (
            200,
            json!({ "message": "worker registered", "workerID": record.id }),
        ),
        Err(RegistryError::WrongKey) => (401, json!({ "message": "wrong key" })),
        Err(
            err @ (RegistryError::Serialize { .. }
            | RegistryError::Persist { .. }
            | RegistryError::CreateDir { .. }),
        ) => {
            error!("Worker registration failed: {}", err);
            (500, json!({ "message": "error saving worker" }))
        }
    }
}

async fn quick_start(request: &HttpRequest, state: &ServerState) -> (u16, Value) {
    let setup = match parse_body::<QuickStartRequest>(request) {
        Ok(setup) => setup,
        Err(err) => return (err.status, json!({ "message": err.message })),
    };
    let root_url = request.headers.get("host").cloned().unwrap_or_default();

    match state
        .config
        .initialize(setup.admin, setup.password, root_url)
        .await
    {
        Ok(config) => match serde_json::to_value(&config) {
            Ok(body) => (200, body),
            Err(err) => {
                error!("Failed to serialize config: {}", err);
                (500, json!({ "message": "error saving config" }))
            }
        },
        Err(ConfigError::AlreadyInitialized) => (
            500,
            json!({ "message": "Config file already exists. Please delete it and try again." }),
        ),
        Err(
            err @ (ConfigError::ReadConfig { .. }
            | ConfigError::ParseConfig { .. }
            | ConfigError::WriteConfig { .. }
            | ConfigError::SerializeConfig { .. }),
        ) => {
            error!("First-run setup failed: {}", err);
            (500, json!({ "message": "error saving config" }))
        }
    }
}

fn parse_body<T>(request: &HttpRequest) -> Result<T, RequestError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_slice(&request.body)
        .map_err(|err| RequestError::new(400, format!("invalid request body: {}", err)))
}

async fn respond(socket: &mut TcpStream, status: u16, body: &Value) {
    if write_json(socket, status, body).await.is_err() {
        // Socket closed while writing the response.
    }
}
