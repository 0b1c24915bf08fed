//! Route configuration for the agronomy endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{analyze_soil, chat, detect_disease, health, service_info, AgronomyAppState};

/// Creates the agronomy router.
///
/// Routes:
/// - `GET /` - Service information
/// - `GET /health` - Liveness check
/// - `POST /api/disease-detection` - Multipart upload, field `image`
/// - `POST /api/soil-analysis` - Multipart upload, field `image`
/// - `POST /api/chat` - JSON `{message, userName?}`
pub fn agronomy_router() -> Router<AgronomyAppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/api/disease-detection", post(detect_disease))
        .route("/api/soil-analysis", post(analyze_soil))
        .route("/api/chat", post(chat))
}
