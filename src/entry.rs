use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::args::ControllerArgs;
use crate::config::ConfigStore;
use crate::engine::JobEngine;
use crate::error::{AppError, AppResult};
use crate::registry::WorkerRegistry;
use crate::server::{self, ServerState};

/// Parses the CLI, sets up logging, and runs the controller until ctrl-c.
///
/// # Errors
///
/// Returns an error when startup fails (config, workers directory, HTTP
/// client, or listener).
pub fn run() -> AppResult<()> {
    let args = ControllerArgs::parse();
    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_async(args))
}

async fn run_async(args: ControllerArgs) -> AppResult<()> {
    let config = ConfigStore::open(args.config_path.as_str()).map_err(AppError::config)?;
    let registry = WorkerRegistry::open(args.workers_path.as_str()).map_err(AppError::registry)?;
    let engine = JobEngine::new(Duration::from_millis(args.probe_timeout_ms))
        .map_err(AppError::engine)?;
    let state = Arc::new(ServerState {
        engine,
        registry,
        config,
    });

    let listener = server::bind(&args.listen).await.map_err(AppError::server)?;
    info!("Control API listening on {}", args.listen);

    tokio::select! {
        () = server::serve(listener, state) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutting down");
        }
    }
    Ok(())
}
