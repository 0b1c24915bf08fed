//! DetectDiseaseHandler - Diagnoses plant disease from an uploaded photo.

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::DEFAULT_MODEL_DEADLINE;
use crate::domain::agronomy::{prompts, DiseaseReport};
use crate::ports::AIProvider;

use super::{request_analysis, AnalysisOutcome};

const OPERATION: &str = "disease_detection";

/// Command carrying the raw upload.
#[derive(Debug, Clone)]
pub struct DetectDiseaseCommand {
    pub image: Vec<u8>,
}

/// Handler for plant disease detection.
///
/// Never fails: every problem is reported through the returned record.
pub struct DetectDiseaseHandler {
    provider: Option<Arc<dyn AIProvider>>,
    deadline: Duration,
}

impl DetectDiseaseHandler {
    pub fn new(provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self {
            provider,
            deadline: DEFAULT_MODEL_DEADLINE,
        }
    }

    /// Bounds the wait for the model; past it the fallback record is returned.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn handle(&self, cmd: DetectDiseaseCommand) -> DiseaseReport {
        let reply = match request_analysis(
            self.provider.as_deref(),
            self.deadline,
            OPERATION,
            prompts::DISEASE_DETECTION_PROMPT,
            cmd.image,
        )
        .await
        {
            AnalysisOutcome::Reply(text) => text,
            AnalysisOutcome::BadImage(err) => {
                return DiseaseReport::processing_error(err.to_string());
            }
            AnalysisOutcome::Unavailable => return DiseaseReport::service_unavailable(),
        };

        match DiseaseReport::from_reply(&reply) {
            Ok(report) => {
                tracing::info!(
                    disease = %report.disease,
                    confidence = format_args!("{:.1}%", report.confidence_percent()),
                    is_plant = report.success,
                    "disease detection complete"
                );
                report
            }
            Err(err) => {
                tracing::warn!(error = %err, reply = %reply, "unusable disease detection reply");
                DiseaseReport::service_unavailable()
            }
        }
    }
}
