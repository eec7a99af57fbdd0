//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{domain::Registry, error::ServerError};

use super::{handler::websocket_handler, signal::shutdown_signal, state::AppState};

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(Arc::new(Registry::new()));
/// server.run("0.0.0.0:8080").await?;
/// ```
pub struct Server {
    registry: Arc<Registry>,
}

impl Server {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Build the router. The relay has a single entry point at `/`.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            registry: self.registry.clone(),
        });

        Router::new()
            .route("/", get(websocket_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind `addr` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn run(self, addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
