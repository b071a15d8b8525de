use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use volley::config::ConfigStore;
use volley::engine::JobEngine;
use volley::registry::WorkerRegistry;
use volley::server::{self, ServerState};

pub fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Spawns a full controller over a scratch home directory and returns its
/// base URL.
pub async fn spawn_controller(home: &Path) -> Result<String, String> {
    let config = ConfigStore::open(home.join("config.json"))
        .map_err(|err| format!("config open failed: {}", err))?;
    let registry = WorkerRegistry::open(home.join("workers"))
        .map_err(|err| format!("registry open failed: {}", err))?;
    let engine = JobEngine::new(Duration::from_secs(2))
        .map_err(|err| format!("engine build failed: {}", err))?;
    let state = Arc::new(ServerState {
        engine,
        registry,
        config,
    });

    let listener = server::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local_addr failed: {}", err))?;
    tokio::spawn(server::serve(listener, state));
    Ok(format!("http://{}", addr))
}

/// Minimal always-200 target for probe traffic.
pub async fn spawn_target_server() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("target bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("target local_addr failed: {}", err))?;

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buffer = [0u8; 1024];
                if socket.read(&mut buffer).await.is_err() {
                    return;
                }
                let response =
                    b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";
                if socket.write_all(response).await.is_err() {
                    // Probe went away mid-response.
                }
            });
        }
    });
    Ok(format!("http://{}", addr))
}
