mod http;
mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::error;

use crate::error::ServerError;

pub use routes::ServerState;

/// Binds the control API listener.
///
/// # Errors
///
/// Returns an error when the address cannot be bound.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|err| ServerError::Bind {
            addr: addr.to_owned(),
            source: err,
        })
}

/// Accept loop for the control API: one spawned task per connection, so a
/// slow caller never stalls the listener or its sibling handlers.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(result) => result,
            Err(err) => {
                error!("Failed to accept control connection: {}", err);
                continue;
            }
        };
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            routes::handle_connection(socket, peer, state).await;
        });
    }
}
