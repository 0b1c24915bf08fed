//! AnalyzeSoilHandler - Estimates soil properties from an uploaded photo.

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::DEFAULT_MODEL_DEADLINE;
use crate::domain::agronomy::{prompts, SoilReport};
use crate::ports::AIProvider;

use super::{request_analysis, AnalysisOutcome};

const OPERATION: &str = "soil_analysis";

/// Command carrying the raw upload.
#[derive(Debug, Clone)]
pub struct AnalyzeSoilCommand {
    pub image: Vec<u8>,
}

/// Handler for soil analysis. Never fails.
pub struct AnalyzeSoilHandler {
    provider: Option<Arc<dyn AIProvider>>,
    deadline: Duration,
}

impl AnalyzeSoilHandler {
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

    pub async fn handle(&self, cmd: AnalyzeSoilCommand) -> SoilReport {
        let reply = match request_analysis(
            self.provider.as_deref(),
            self.deadline,
            OPERATION,
            prompts::SOIL_ANALYSIS_PROMPT,
            cmd.image,
        )
        .await
        {
            AnalysisOutcome::Reply(text) => text,
            AnalysisOutcome::BadImage(_) => return SoilReport::processing_error(),
            AnalysisOutcome::Unavailable => return SoilReport::service_unavailable(),
        };

        match SoilReport::from_reply(&reply) {
            Ok(report) => {
                tracing::info!(
                    soil_type = %report.soil_type,
                    ph = report.ph_estimate,
                    is_soil = report.success,
                    "soil analysis complete"
                );
                report
            }
            Err(err) => {
                tracing::warn!(error = %err, reply = %reply, "unusable soil analysis reply");
                SoilReport::service_unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn jpeg() -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(8, 8))
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(80))
            .unwrap();
        buf
    }

    fn handler(mock: &MockAIProvider) -> AnalyzeSoilHandler {
        AnalyzeSoilHandler::new(Some(Arc::new(mock.clone())))
    }

    #[tokio::test]
    async fn analyzes_prose_wrapped_reply() {
        let mock = MockAIProvider::new().with_response(
            "Here is my assessment:\n{\"is_soil\": true, \"soil_type\": \"Clay\", \
             \"ph_estimate\": 6.2, \"suitable_crops\": [\"Rice\", \"Sugarcane\"]}\nHope this helps!",
        );

        let report = handler(&mock).handle(AnalyzeSoilCommand { image: jpeg() }).await;

        assert!(report.success);
        assert_eq!(report.soil_type, "Clay");
        assert_eq!(report.ph_estimate, 6.2);
        assert_eq!(report.suitable_crops, vec!["Rice", "Sugarcane"]);
        assert_eq!(report.nitrogen, "Medium");

        let call = mock.last_call().unwrap();
        assert_eq!(call.metadata.operation, "soil_analysis");
        assert_eq!(call.image_count(), 1);
    }

    #[tokio::test]
    async fn no_provider_returns_service_unavailable() {
        let report = AnalyzeSoilHandler::new(None)
            .handle(AnalyzeSoilCommand { image: jpeg() })
            .await;
        assert_eq!(report, SoilReport::service_unavailable());
    }

    #[tokio::test]
    async fn provider_error_returns_service_unavailable() {
        let mock = MockAIProvider::new().with_error(MockError::Network {
            message: "connection reset".to_string(),
        });
        let report = handler(&mock).handle(AnalyzeSoilCommand { image: jpeg() }).await;
        assert_eq!(report, SoilReport::service_unavailable());
    }

    #[tokio::test]
    async fn array_reply_returns_service_unavailable() {
        let mock = MockAIProvider::new().with_response(r#"["Clay", 6.5]"#);
        let report = handler(&mock).handle(AnalyzeSoilCommand { image: jpeg() }).await;
        assert_eq!(report, SoilReport::service_unavailable());
    }

    #[tokio::test]
    async fn empty_upload_is_a_processing_error() {
        let mock = MockAIProvider::new();
        let report = handler(&mock)
            .handle(AnalyzeSoilCommand { image: Vec::new() })
            .await;

        assert_eq!(report, SoilReport::processing_error());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn slow_model_returns_service_unavailable() {
        let mock = MockAIProvider::new()
            .with_response(r#"{"soil_type": "Loam"}"#)
            .with_delay(Duration::from_millis(500));

        let report = handler(&mock)
            .with_deadline(Duration::from_millis(20))
            .handle(AnalyzeSoilCommand { image: jpeg() })
            .await;

        assert_eq!(report, SoilReport::service_unavailable());
        assert_eq!(mock.call_count(), 1);
    }
}
