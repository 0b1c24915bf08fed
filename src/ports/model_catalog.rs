//! Model Catalog Port - discovering which models a key may call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::AIError;

/// Generation method a model must support to serve completions.
pub const GENERATE_CONTENT: &str = "generateContent";

/// Port for listing the models exposed by a provider.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Returns every model visible to the configured credentials.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, AIError>;
}

/// A model as advertised by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Resource name, e.g. `models/gemini-2.5-flash`.
    pub name: String,
    /// Human readable name.
    pub display_name: String,
    /// Supported generation methods, e.g. `generateContent`, `embedContent`.
    pub supported_generation_methods: Vec<String>,
}

impl ModelDescriptor {
    /// True when the model can be used for completions (text and image input).
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }

    /// Model id without the `models/` resource prefix.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(methods: &[&str]) -> ModelDescriptor {
        ModelDescriptor {
            name: "models/gemini-2.5-flash".to_string(),
            display_name: "Gemini 2.5 Flash".to_string(),
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn generate_content_support_is_detected() {
        assert!(descriptor(&["countTokens", "generateContent"]).supports_generate_content());
        assert!(!descriptor(&["embedContent"]).supports_generate_content());
    }

    #[test]
    fn short_name_strips_resource_prefix() {
        assert_eq!(descriptor(&[]).short_name(), "gemini-2.5-flash");

        let bare = ModelDescriptor {
            name: "gemini-pro".to_string(),
            ..descriptor(&[])
        };
        assert_eq!(bare.short_name(), "gemini-pro");
    }
}
