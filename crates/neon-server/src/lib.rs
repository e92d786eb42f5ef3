//! HTTP front door for the Neon Code runner
//!
//! Exposes a single `POST /run` endpoint: the editor sends `{"code": ...}` and
//! always gets back `{"output": ...}`, whether the program printed something,
//! raised, timed out or could not be started at all. Execution is delegated to a
//! `CodeExecutor`, so the router can be driven by the local interpreter in
//! production and by a stub in tests.

pub mod error;

pub use error::{Result, ServerError};
pub use neon_core::{
    CodeExecutor, ExecutorConfig, ExecutorError, LocalCodeExecutor, ProcessOutput, RunOutcome,
};

use axum::extract::{DefaultBodyLimit, Json as AxumJson, Request, State};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::{Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

/// Body of a `POST /run` request.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeRequest {
    pub code: String,
}

/// Body of every `POST /run` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionResult {
    pub output: String,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Configuration for the runner server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
    /// CORS allowed origins (if None, any origin is mirrored back)
    pub cors_origins: Option<Vec<String>>,
    /// Maximum request body size in bytes (if None, bodies are unbounded)
    pub max_body_size: Option<usize>,
    /// Enable request logging
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            enable_cors: true,
            cors_origins: None,
            max_body_size: None,
            enable_logging: true,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Parse and set the bind address from a string.
    pub fn with_bind_addr_str(mut self, addr: &str) -> Result<Self> {
        self.bind_addr = addr
            .parse()
            .map_err(|e| ServerError::config_error(format!("Invalid bind address '{}': {}", addr, e)))?;
        Ok(self)
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    /// Restrict CORS to the given origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Cap the request body size.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = Some(size);
        self
    }

    /// Enable or disable request logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }
}

/// Shared application state containing the executor.
#[derive(Clone)]
pub struct AppState<E: CodeExecutor + Clone> {
    pub executor: E,
}

/// Handler for the /run POST endpoint.
///
/// Execution failures are folded into `output`; only malformed requests are
/// rejected, by the JSON extractor, before this runs.
async fn run_handler<E: CodeExecutor + Clone>(
    State(app_state): State<AppState<E>>,
    AxumJson(request): AxumJson<CodeRequest>,
) -> Json<ExecutionResult> {
    log::info!("Received run request with {} bytes of code", request.code.len());

    let outcome = app_state.executor.run(&request.code).await;
    if let RunOutcome::Failure(ref reason) = outcome {
        log::warn!("Execution failed: {}", reason);
    }

    Json(ExecutionResult {
        output: outcome.into_text(),
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();

    log::info!("Request {} {} {}", request_id, method, uri);

    let start = std::time::Instant::now();
    let response = next.run(request).await;

    log::info!(
        "Response {} {} completed in {:?}",
        request_id,
        response.status(),
        start.elapsed()
    );

    response
}

/// The code runner HTTP server.
pub struct NeonServer<E: CodeExecutor + Clone> {
    executor: E,
    config: ServerConfig,
}

impl<E: CodeExecutor + Clone + 'static> NeonServer<E> {
    /// Create a new server with the given executor and default configuration.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            config: ServerConfig::default(),
        }
    }

    /// Create a new server with custom configuration.
    pub fn with_config(executor: E, config: ServerConfig) -> Self {
        Self { executor, config }
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the Axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let state = AppState {
            executor: self.executor.clone(),
        };

        let body_limit = match self.config.max_body_size {
            Some(size) => DefaultBodyLimit::max(size),
            None => DefaultBodyLimit::disable(),
        };

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/run", post(run_handler::<E>))
            .layer(body_limit)
            .with_state(state);

        if self.config.enable_logging {
            router = router.layer(middleware::from_fn(log_requests));
        }

        if self.config.enable_cors {
            router = router.layer(self.cors_layer());
        }

        router
    }

    /// Without an origin list the request's origin, method and headers are
    /// mirrored back, since a literal `*` cannot be combined with credentials.
    fn cors_layer(&self) -> CorsLayer {
        let Some(ref origins) = self.config.cors_origins else {
            return CorsLayer::very_permissive();
        };

        let parsed: std::result::Result<Vec<HeaderValue>, _> =
            origins.iter().map(|s| s.parse()).collect();
        match parsed {
            Ok(origins) => CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true),
            Err(e) => {
                log::warn!("Ignoring invalid CORS origin list ({}), allowing any origin", e);
                CorsLayer::very_permissive()
            }
        }
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided shutdown signal is received.
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| {
                ServerError::config_error(format!(
                    "Failed to bind to {}: {}",
                    self.config.bind_addr, e
                ))
            })?;

        log::info!("Neon runner listening on {}", self.config.bind_addr);
        log::info!("Run endpoint: http://{}/run", self.config.bind_addr);
        log::info!("Health check: http://{}/health", self.config.bind_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        log::info!("Neon runner shut down gracefully");
        Ok(())
    }
}

/// Utility function to create a shutdown signal from Ctrl+C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}
