//! HTTP surface: router, middleware and server lifecycle.

mod response;
pub mod routes;
mod state;
pub mod upload;

pub use response::{AnalyzeResponse, HealthResponse, IdentifyResponse};
pub use state::AppState;
pub use upload::UploadStore;

use crate::analysis::Analyzer;
use crate::config::{Config, ServerConfig};
use crate::error::{Error, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the application router.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let body_limit = server
        .max_upload_bytes
        .map_or_else(DefaultBodyLimit::disable, DefaultBodyLimit::max);

    // Multipart reads enforce this limit and report it as 413.
    let mut router = Router::new()
        .route("/", get(routes::root))
        .route("/analyze/", post(routes::analyze))
        .route("/analyze", post(routes::analyze))
        .route("/identificarAve", post(routes::identify))
        .with_state(state)
        .layer(body_limit);

    // Insecure: any origin may call the API. Restrict before public deployment.
    if server.permissive_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &Config, analyzer: Arc<dyn Analyzer>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(analyzer, config);
    let uploads = state.uploads();
    let app = build_router(state, &config.server);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Server {
            addr: addr.clone(),
            source,
        })?;

    info!(
        "Listening on http://{} (uploads in {}, retain: {})",
        addr,
        uploads.dir().display(),
        uploads.retains()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| Error::Server { addr, source })?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
