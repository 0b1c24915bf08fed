//! Plant disease report.

use serde::{Deserialize, Serialize};

use super::reply::{parse_reply_object, ReplyError};

/// Confidence assumed when the model omits one.
pub const DEFAULT_CONFIDENCE: f64 = 0.75;

/// Normalized result of a plant disease analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseReport {
    /// False when the image is not a plant or the analysis failed.
    pub success: bool,
    pub disease: String,
    /// Always within `0.0..=1.0`.
    pub confidence: f64,
    pub severity: String,
    pub description: String,
    pub treatment: String,
    pub prevention: String,
}

impl DiseaseReport {
    /// Builds a report from the model's reply text.
    pub fn from_reply(text: &str) -> Result<Self, ReplyError> {
        let fields = parse_reply_object(text)?;
        let confidence = fields.number("confidence", DEFAULT_CONFIDENCE)?;

        Ok(Self {
            success: fields.flag("is_plant", true),
            disease: fields.text("disease", "Unknown"),
            confidence: normalize_confidence(confidence),
            severity: fields.text("severity", "Unknown"),
            description: fields.text("description", "Analysis completed"),
            treatment: fields.text("treatment", "Consult agricultural expert"),
            prevention: fields.text("prevention", "Monitor regularly"),
        })
    }

    /// Report returned whenever the model cannot be reached or understood.
    pub fn service_unavailable() -> Self {
        Self {
            success: false,
            disease: "Service Unavailable".to_string(),
            confidence: 0.0,
            severity: "Error".to_string(),
            description:
                "AI service temporarily unavailable. Please check your internet connection."
                    .to_string(),
            treatment: "Verify network connectivity".to_string(),
            prevention: "Ensure stable internet connection".to_string(),
        }
    }

    /// Report returned when the upload itself could not be processed.
    pub fn processing_error(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            disease: "Processing Error".to_string(),
            confidence: 0.0,
            severity: "Error".to_string(),
            description: reason.into(),
            treatment: "Please try again".to_string(),
            prevention: "Ensure image is valid".to_string(),
        }
    }

    /// Confidence as a percentage, for logging.
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

/// Reads percentages (e.g. `87`) as fractions and clamps to `0.0..=1.0`.
pub fn normalize_confidence(raw: f64) -> f64 {
    let value = if raw > 1.0 && raw <= 100.0 {
        raw / 100.0
    } else {
        raw
    };
    value.clamp(0.0, 1.0)
}
