use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use super::AppState;
use crate::errors::AppError;

/// Run OCR over the raw image bytes in the request body.
///
/// 200 with canonical JSON on success, 400 for bytes that do not decode as
/// an image, 500 with the error message for everything else. Exactly one
/// response per request.
pub async fn ocr_page(State(state): State<AppState>, body: Bytes) -> Response {
    match state.ocr_service.process(body).await {
        Ok(result) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(result))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(AppError::InvalidImage) => {
            (StatusCode::BAD_REQUEST, "Invalid image").into_response()
        }
        Err(e) => {
            error!("OCR request failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
