//! HTTP API for the analytics proxy

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ErrorResponse, ServerError};
pub use routes::{HealthResponse, StreamSummary};
pub use state::AppState;

use std::net::SocketAddr;

use anyhow::Context;
use axum::{response::IntoResponse, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::twitch::{HttpClient, ReqwestClient};

/// The analytics HTTP server
pub struct Server<H: HttpClient = ReqwestClient> {
    state: AppState<H>,
}

impl<H: HttpClient + 'static> Server<H> {
    /// Creates a server from a pre-built application state
    pub fn new(state: AppState<H>) -> Self {
        Self { state }
    }

    /// Builds the router with all routes and middleware
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/api/analytics/user", get(routes::user_handler::<H>))
            .route("/api/analytics/streams", get(routes::streams_handler::<H>))
            .fallback(routes::not_found)
            .layer(CatchPanicLayer::custom(
                |_: Box<dyn std::any::Any + Send + 'static>| ServerError::Panic.into_response(),
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server until Ctrl-C or SIGTERM
    pub async fn run(self, addr: SocketAddr) -> anyhow::Result<()> {
        let router = self.router();

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        tracing::info!("Listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
