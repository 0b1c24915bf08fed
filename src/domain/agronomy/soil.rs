//! Soil analysis report.

use serde::{Deserialize, Serialize};

use super::reply::{parse_reply_object, ReplyError};

/// pH assumed when the model omits one.
pub const DEFAULT_PH: f64 = 6.5;

const DEFAULT_CROPS: [&str; 3] = ["Rice", "Wheat", "Vegetables"];

/// Normalized result of a soil analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilReport {
    /// False when the image is not soil or the analysis failed.
    pub success: bool,
    pub soil_type: String,
    pub color: String,
    pub texture: String,
    pub moisture: String,
    /// Always within `0.0..=14.0`.
    pub ph_estimate: f64,
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub organic_matter: String,
    pub recommendations: String,
    pub suitable_crops: Vec<String>,
    pub improvements: String,
}

impl SoilReport {
    /// Builds a report from the model's reply text.
    pub fn from_reply(text: &str) -> Result<Self, ReplyError> {
        let fields = parse_reply_object(text)?;
        let ph = fields.number("ph_estimate", DEFAULT_PH)?;

        Ok(Self {
            success: fields.flag("is_soil", true),
            soil_type: fields.text("soil_type", "Unknown"),
            color: fields.text("color", "Not determined"),
            texture: fields.text("texture", "Medium"),
            moisture: fields.text("moisture", "Unknown"),
            ph_estimate: ph.clamp(0.0, 14.0),
            nitrogen: fields.text("nitrogen", "Medium"),
            phosphorus: fields.text("phosphorus", "Medium"),
            potassium: fields.text("potassium", "Medium"),
            organic_matter: fields.text("organic_matter", "Medium"),
            recommendations: fields.text("recommendations", "Consult local agricultural expert"),
            suitable_crops: fields.list("suitable_crops", &DEFAULT_CROPS),
            improvements: fields.text("improvements", "Add organic compost"),
        })
    }

    /// Report returned whenever the model cannot be reached or understood.
    pub fn service_unavailable() -> Self {
        Self {
            success: false,
            soil_type: "Analysis Unavailable".to_string(),
            color: "Unknown".to_string(),
            texture: "Unknown".to_string(),
            moisture: "Unknown".to_string(),
            ph_estimate: DEFAULT_PH,
            nitrogen: "Medium".to_string(),
            phosphorus: "Medium".to_string(),
            potassium: "Medium".to_string(),
            organic_matter: "Medium".to_string(),
            recommendations: "AI service temporarily unavailable".to_string(),
            suitable_crops: Vec::new(),
            improvements: "Please try again".to_string(),
        }
    }

    /// Report returned when the upload itself could not be processed.
    pub fn processing_error() -> Self {
        let unknown = || "Unknown".to_string();
        Self {
            success: false,
            soil_type: "Processing Error".to_string(),
            color: unknown(),
            texture: unknown(),
            moisture: unknown(),
            ph_estimate: DEFAULT_PH,
            nitrogen: unknown(),
            phosphorus: unknown(),
            potassium: unknown(),
            organic_matter: unknown(),
            recommendations: "Error processing image".to_string(),
            suitable_crops: Vec::new(),
            improvements: "Please try again".to_string(),
        }
    }
}
