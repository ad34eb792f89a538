#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod auth;
mod error;
mod health;
mod index;
mod models;

use std::net::SocketAddr;

use axum::Router;
use conduit_config::Config;
use conduit_llm::LlmState;
use tower_http::trace::TraceLayer;

pub use error::ServerError;
pub use models::{CATALOGUE, ModelInfo};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream timeouts are invalid or the HTTP
    /// client cannot be built
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let llm_state = LlmState::from_config(&config.llm)?;

        let mut app = Router::new().route("/", axum::routing::get(index::index_handler));

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app
            .merge(models::models_router())
            .merge(conduit_llm::llm_router(llm_state))
            .fallback(not_found);

        // Gateway authentication
        if let Some(ref auth_config) = config.server.auth
            && auth_config.enabled
        {
            let mut exact = vec!["/".to_owned()];
            if config.server.health.enabled {
                exact.push(config.server.health.path.clone());
            }
            let public = auth::PublicPaths::new(exact, auth_config.public_paths.clone());
            let api_key = auth_config.api_key.clone();

            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let api_key = api_key.clone();
                let public = public.clone();
                async move { auth::auth_middleware(api_key, public, req, next).await }
            }));
        }

        // Tracing (outermost, so rejected requests are traced too)
        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

async fn not_found() -> axum::response::Response {
    conduit_llm::handler::error_response(&ServerError::EndpointNotFound)
}
