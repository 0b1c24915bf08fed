//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Gemini provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Gemini API key. Without it the service answers with fallback records.
    pub gemini_api_key: Option<String>,

    /// Primary model
    #[serde(default = "default_model")]
    pub model: String,

    /// Models tried in order when the primary one fails (comma-separated)
    #[serde(default = "default_fallback_models")]
    pub fallback_models: String,

    /// Base URL of the Generative Language API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature sent with every request
    pub temperature: Option<f32>,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Gemini is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Primary model followed by the fallback models, without duplicates.
    pub fn model_candidates(&self) -> Vec<String> {
        let mut models: Vec<String> = Vec::new();
        let primary = std::iter::once(self.model.as_str());
        for name in primary.chain(self.fallback_models.split(',')) {
            let name = name.trim();
            if !name.is_empty() && !models.iter().any(|m| m == name) {
                models.push(name.to_string());
            }
        }
        models
    }

    /// Longest a single request can spend on the model: every candidate
    /// timing out on every attempt.
    pub fn worst_case_secs(&self) -> u64 {
        let attempts = u64::from(self.max_retries).saturating_add(1);
        let candidates = self.model_candidates().len().max(1) as u64;
        self.timeout_secs
            .saturating_mul(candidates)
            .saturating_mul(attempts)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: default_model(),
            fallback_models: default_fallback_models(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_fallback_models() -> String {
    "gemini-flash-latest,gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    0
}
