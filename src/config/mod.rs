//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AGRISMART` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use agrismart_ml::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Plain environment variable consulted when no prefixed key is set.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gemini configuration
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AGRISMART` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `GEMINI_API_KEY` for the API key
    ///
    /// # Environment Variable Format
    ///
    /// - `AGRISMART__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `AGRISMART__AI__MODEL=gemini-2.0-flash` -> `ai.model = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AGRISMART")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if !config.ai.has_gemini() {
            if let Ok(key) = std::env::var(GEMINI_API_KEY_VAR) {
                config.ai.gemini_api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;

        let worst_case_secs = self.ai.worst_case_secs();
        if worst_case_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::ModelBudgetExceedsRequestTimeout {
                worst_case_secs,
                request_timeout_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
