//! HTTP handlers for the agronomy endpoints.
//!
//! Analysis and chat endpoints always answer 200 with a record once the
//! request itself is well formed; failures of the model show up inside the
//! record. Only malformed requests get an [`ErrorResponse`].

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::analysis::{
    AnalyzeSoilCommand, AnalyzeSoilHandler, DetectDiseaseCommand, DetectDiseaseHandler,
};
use crate::application::handlers::chat::AnswerQuestionHandler;
use crate::application::handlers::DEFAULT_MODEL_DEADLINE;
use crate::domain::agronomy::{ChatReply, DiseaseReport, SoilReport};
use crate::ports::AIProvider;

use super::dto::{ChatRequest, ErrorResponse, HealthResponse, ServiceInfoResponse};

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

// ════════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AgronomyAppState {
    pub disease: Arc<DetectDiseaseHandler>,
    pub soil: Arc<AnalyzeSoilHandler>,
    pub chat: Arc<AnswerQuestionHandler>,
}

impl AgronomyAppState {
    /// Wires every handler to the same provider. `None` leaves the service
    /// running with fallback answers only.
    pub fn new(provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self::with_model_deadline(provider, DEFAULT_MODEL_DEADLINE)
    }

    /// Same as [`AgronomyAppState::new`] with an explicit bound on how long
    /// each handler waits for the model.
    pub fn with_model_deadline(provider: Option<Arc<dyn AIProvider>>, deadline: Duration) -> Self {
        Self {
            disease: Arc::new(DetectDiseaseHandler::new(provider.clone()).with_deadline(deadline)),
            soil: Arc::new(AnalyzeSoilHandler::new(provider.clone()).with_deadline(deadline)),
            chat: Arc::new(AnswerQuestionHandler::new(provider).with_deadline(deadline)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum AgronomyApiError {
    BadRequest(String),
    MissingField(&'static str),
    Unprocessable(String),
    PayloadTooLarge(String),
}

impl From<MultipartRejection> for AgronomyApiError {
    fn from(rejection: MultipartRejection) -> Self {
        AgronomyApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AgronomyApiError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AgronomyApiError::PayloadTooLarge(err.body_text()),
            _ => AgronomyApiError::BadRequest(err.body_text()),
        }
    }
}

impl From<JsonRejection> for AgronomyApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => {
                AgronomyApiError::Unprocessable(rejection.body_text())
            }
            StatusCode::PAYLOAD_TOO_LARGE => {
                AgronomyApiError::PayloadTooLarge(rejection.body_text())
            }
            _ => AgronomyApiError::BadRequest(rejection.body_text()),
        }
    }
}

impl IntoResponse for AgronomyApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AgronomyApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            AgronomyApiError::MissingField(field) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::missing_field(field),
            ),
            AgronomyApiError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::validation(msg),
            ),
            AgronomyApiError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::payload_too_large(msg),
            ),
        };

        tracing::debug!(status = %status, code = %error.code, message = %error.message, "request rejected");
        (status, Json(error)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Service information
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse::current())
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// POST /api/disease-detection - Diagnose a plant photo
pub async fn detect_disease(
    State(state): State<AgronomyAppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DiseaseReport>, AgronomyApiError> {
    tracing::info!("disease detection request");
    let image = read_image_field(multipart?).await?;

    let report = state.disease.handle(DetectDiseaseCommand { image }).await;
    Ok(Json(report))
}

/// POST /api/soil-analysis - Assess a soil photo
pub async fn analyze_soil(
    State(state): State<AgronomyAppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SoilReport>, AgronomyApiError> {
    tracing::info!("soil analysis request");
    let image = read_image_field(multipart?).await?;

    let report = state.soil.handle(AnalyzeSoilCommand { image }).await;
    Ok(Json(report))
}

/// POST /api/chat - Ask the farming assistant
pub async fn chat(
    State(state): State<AgronomyAppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AgronomyApiError> {
    let Json(request) = payload?;

    let reply = state.chat.handle(request.into_command()).await;
    Ok(Json(reply))
}

/// Returns the bytes of the first `image` field, skipping any others.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, AgronomyApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        tracing::debug!(
            file_name = ?file_name,
            content_type = ?content_type,
            bytes = bytes.len(),
            "image field read"
        );
        return Ok(bytes.to_vec());
    }

    Err(AgronomyApiError::MissingField(IMAGE_FIELD))
}
