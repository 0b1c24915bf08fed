//! Application handlers.
//!
//! Command handlers that turn uploads and questions into model requests and
//! normalize the replies.

pub mod analysis;
pub mod chat;

use std::time::Duration;

/// How long a handler waits for the model before answering with its
/// fallback record. Stays under the default server request timeout.
pub const DEFAULT_MODEL_DEADLINE: Duration = Duration::from_secs(115);

pub use analysis::{AnalyzeSoilCommand, AnalyzeSoilHandler, DetectDiseaseCommand, DetectDiseaseHandler};
pub use chat::{AnswerQuestionCommand, AnswerQuestionHandler};
