//! HTTP DTOs (Data Transfer Objects) for the agronomy endpoints.
//!
//! Analysis endpoints answer with the domain reports directly; these types
//! cover the chat request and the service-level responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::handlers::chat::AnswerQuestionCommand;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Absent, null or blank means the default name.
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
}

impl ChatRequest {
    pub fn into_command(self) -> AnswerQuestionCommand {
        AnswerQuestionCommand::new(self.message, self.user_name)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub status: String,
    pub version: String,
    pub ai: String,
    pub features: Vec<String>,
    pub endpoints: BTreeMap<String, String>,
}

impl ServiceInfoResponse {
    pub fn current() -> Self {
        let endpoints = [
            ("disease_detection", "/api/disease-detection"),
            ("soil_analysis", "/api/soil-analysis"),
            ("chat", "/api/chat"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            service: "AgriSmart ML Service".to_string(),
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ai: "Google Gemini Vision".to_string(),
            features: ["Disease Detection", "Soil Analysis", "AI Chatbot"]
                .into_iter()
                .map(String::from)
                .collect(),
            endpoints,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "ML Service".to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// A required request field is absent.
    pub fn missing_field(field: &str) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: format!("Field required: {}", field),
            details: Some(serde_json::json!({ "field": field })),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            code: "PAYLOAD_TOO_LARGE".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
