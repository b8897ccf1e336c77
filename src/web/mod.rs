//! Web layer module
//!
//! HTTP interface for the OCR server. The surface is deliberately small:
//! one POST endpoint whose entire body is the raw image bytes (no multipart
//! framing), plus a health check. Handlers stay thin and delegate to the
//! cache service; error-to-status mapping lives in `handlers`.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::ocr_cache::OcrCacheService;

pub mod handlers;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &Config, ocr_service: OcrCacheService) -> Result<Self> {
        let app = Self::create_router(AppState { ocr_service });
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            // The OCR endpoint: request body = raw image bytes
            .route("/", post(handlers::ocr_page))
            // Health check endpoint
            .route("/health", get(handlers::health_check))
            // Page scans can be tens of megabytes; the body is accepted at
            // arbitrary length instead of axum's 2 MB default cap
            .layer(DefaultBodyLimit::disable())
            // Middleware (applied in reverse order)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            // Shared state
            .with_state(state)
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        tracing::info!("Server running on http://{}", self.addr);
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ocr_service: OcrCacheService,
}
