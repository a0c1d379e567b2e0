//! Web shell: upload a PDF, see the status and a text preview, download the DOCX.
//!
//! | Route | Method | Answer |
//! |-------|--------|--------|
//! | `/` | GET | upload page |
//! | `/convert` | POST | HTML page with status, preview and a download link |
//! | `/api/convert` | POST | raw DOCX bytes, status in `X-Conversion-Status` |
//! | `/health` | GET | JSON health check |
//!
//! Both upload routes take a multipart body with the PDF in the `file` field.
//! Each request converts on tokio's blocking pool with its own scratch files,
//! so concurrent uploads never share state.

mod error;
mod handlers;
mod page;

pub use error::ShellError;
pub use handlers::{HealthResponse, STATUS_HEADER};

use crate::config::ConversionConfig;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Default port of `pdf2word serve`.
pub const DEFAULT_PORT: u16 = 8501;

/// Listener settings for the shell.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to. Default: `127.0.0.1`.
    pub host: String,
    /// Port to listen on. Default: 8501.
    pub port: u16,
    /// Request body cap in bytes; `None` accepts uploads of any size.
    pub max_upload_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConversionConfig>,
}

impl AppState {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the shell's router.
pub fn router(state: AppState, max_upload_bytes: Option<usize>) -> Router {
    let body_limit = match max_upload_bytes {
        Some(bytes) => DefaultBodyLimit::max(bytes),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/convert", post(handlers::convert_form))
        .route("/api/convert", post(handlers::convert_api))
        .route("/health", get(handlers::health))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `server.host:server.port` and serve until the process is stopped.
pub async fn serve(server: &ServerConfig, config: ConversionConfig) -> std::io::Result<()> {
    let app = router(AppState::new(config), server.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;

    info!("Server listening on http://{}", listener.local_addr()?);
    match server.max_upload_bytes {
        Some(bytes) => info!("Upload limit: {} bytes", bytes),
        None => info!("Upload limit: none"),
    }

    axum::serve(listener, app).await
}
