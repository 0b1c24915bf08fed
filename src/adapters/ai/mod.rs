//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini models over the Generative Language API
//! - `FailoverAIProvider` - Tries an ordered chain of providers
//! - `MockAIProvider` - Configurable mock for testing

mod failover_provider;
mod gemini_provider;
mod mock_provider;

pub use failover_provider::FailoverAIProvider;
pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};

use std::sync::Arc;

use crate::config::AiConfig;
use crate::ports::{AIError, AIProvider};

/// Builds the Gemini failover chain over every configured model candidate.
///
/// Returns `Ok(None)` when no API key is configured.
pub fn gemini_from_config(ai: &AiConfig) -> Result<Option<FailoverAIProvider>, AIError> {
    let Some(api_key) = ai.gemini_api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        return Ok(None);
    };

    let chain = ai
        .model_candidates()
        .iter()
        .map(|model| {
            let provider = GeminiProvider::new(GeminiConfig::from_settings(ai, api_key, model))?;
            Ok(Arc::new(provider) as Arc<dyn AIProvider>)
        })
        .collect::<Result<Vec<_>, AIError>>()?;

    Ok(FailoverAIProvider::from_chain(chain))
}
