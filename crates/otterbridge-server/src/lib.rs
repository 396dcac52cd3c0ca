//! HTTP facade over the Otter.ai API for the Otterbridge gateway.
//!
//! Callers send their Otter.ai credentials with each request; the server
//! keeps one logged-in upstream session per credential in a
//! [`SessionCache`](otterbridge_session::SessionCache) so repeated requests
//! do not log in again.
//!
//! # Routes
//!
//! - `GET  /health`
//! - `POST /api/speeches`
//! - `POST /api/speeches/{id}`
//! - `POST /api/speeches/{id}/transcript`
//! - `POST /api/search`
//! - `POST /api/auth/clear-cache`
//!
//! # Example
//!
//! ```ignore
//! use otterbridge_server::{Server, ServerConfig};
//!
//! let server = Server::new(cache, ServerConfig::new());
//! server.run().await?;
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::ServerConfig;
pub use credentials::{
    EMAIL_HEADER, PASSWORD_HEADER, UserSession, credentials_middleware, resolve_credential,
    session_middleware,
};
pub use error::{ErrorResponse, Result, ServerError};
pub use logging::request_logging_middleware;
pub use state::{AppState, DynAuthenticator, TranscriptCache};

use std::future::Future;
use std::net::SocketAddr;

use axum::{Router, middleware, routing::post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Otterbridge HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server around a session cache.
    pub fn new(cache: TranscriptCache, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(cache, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Application state shared with handlers.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .merge(routes::health_routes())
            .merge(self.api_routes())
            .fallback(routes::not_found_handler)
            .method_not_allowed_fallback(routes::not_found_handler)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::request_logging_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone());

        if self.state.config().cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router
    }

    /// Routes that need credentials.
    ///
    /// Everything here resolves a credential first; all but clear-cache
    /// also acquire an upstream session.
    fn api_routes(&self) -> Router<AppState> {
        let session_routes = Router::new()
            .route("/api/speeches", post(routes::list_speeches_handler))
            .route("/api/speeches/{id}", post(routes::get_speech_handler))
            .route(
                "/api/speeches/{id}/transcript",
                post(routes::get_transcript_handler),
            )
            .route("/api/search", post(routes::search_handler))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                credentials::session_middleware,
            ));

        Router::new()
            .merge(session_routes)
            .route("/api/auth/clear-cache", post(routes::clear_cache_handler))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                credentials::credentials_middleware,
            ))
    }

    /// Run the server on the configured address until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config().bind_address;
        self.run_on(addr).await
    }

    /// Run the server on a specific address until ctrl-c.
    pub async fn run_on(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {addr}: {e}")))?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    ///
    /// Cached sessions are dropped once in-flight requests have finished.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(format!("Failed to read local address: {e}")))?;
        info!(addr = %local_addr, "Starting server");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {e}")))?;

        let dropped = self.state.cache.size();
        self.state.cache.clear();
        info!(dropped, "Server stopped, session cache cleared");

        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config().bind_address
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
