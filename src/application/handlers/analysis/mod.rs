//! Image analysis handlers.
//!
//! Both handlers share the same flow: decode the upload, send prompt and
//! image as one user turn, then normalize the reply into a report.

mod analyze_soil;
mod detect_disease;

pub use analyze_soil::{AnalyzeSoilCommand, AnalyzeSoilHandler};
pub use detect_disease::{DetectDiseaseCommand, DetectDiseaseHandler};

use std::time::Duration;

use crate::domain::agronomy::{ImageError, UploadedImage};
use crate::ports::{AIProvider, CompletionRequest, RequestMetadata};

/// What came back from asking the model about an image.
enum AnalysisOutcome {
    /// Non-empty reply text.
    Reply(String),
    /// The upload could not be decoded; the model was not called.
    BadImage(ImageError),
    /// No model configured, the call failed or ran past the deadline, or
    /// the reply was empty.
    Unavailable,
}

async fn request_analysis(
    provider: Option<&dyn AIProvider>,
    deadline: Duration,
    operation: &'static str,
    prompt: &str,
    bytes: Vec<u8>,
) -> AnalysisOutcome {
    // Decoding and re-encoding large uploads is CPU bound.
    let image = match tokio::task::spawn_blocking(move || UploadedImage::decode(bytes)).await {
        Ok(Ok(image)) => image,
        Ok(Err(err)) => {
            tracing::warn!(operation, error = %err, "rejected upload");
            return AnalysisOutcome::BadImage(err);
        }
        Err(err) => {
            tracing::error!(operation, error = %err, "image decoding task failed");
            return AnalysisOutcome::Unavailable;
        }
    };

    let (width, height) = image.dimensions();
    tracing::info!(
        operation,
        width,
        height,
        mode = image.mode(),
        bytes = image.len(),
        reencoded = image.was_reencoded(),
        "image received"
    );

    let Some(provider) = provider else {
        tracing::warn!(operation, "AI model not initialized");
        return AnalysisOutcome::Unavailable;
    };

    let metadata = RequestMetadata::generate(operation);
    let trace_id = metadata.trace_id.clone();
    let request = CompletionRequest::new(metadata).with_image_message(prompt, image.into_part());

    let completion = match tokio::time::timeout(deadline, provider.complete(request)).await {
        Ok(completion) => completion,
        Err(_) => {
            tracing::error!(
                operation,
                %trace_id,
                deadline_ms = deadline.as_millis() as u64,
                "model call exceeded deadline"
            );
            return AnalysisOutcome::Unavailable;
        }
    };

    match completion {
        Ok(response) if response.content.trim().is_empty() => {
            tracing::warn!(operation, %trace_id, model = %response.model, "empty reply from model");
            AnalysisOutcome::Unavailable
        }
        Ok(response) => {
            tracing::debug!(operation, %trace_id, model = %response.model, "model replied");
            AnalysisOutcome::Reply(response.content)
        }
        Err(err) => {
            tracing::error!(operation, %trace_id, error = %err, "model call failed");
            AnalysisOutcome::Unavailable
        }
    }
}
