//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application handlers and the outside world. Adapters implement these ports.
//!
//! ## AI Ports
//!
//! - `AIProvider` - Text and image completions from a hosted model
//! - `ModelCatalog` - Listing the models available to the configured key

mod ai_provider;
mod model_catalog;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ContentPart, FinishReason,
    ImagePart, Message, MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use model_catalog::{ModelCatalog, ModelDescriptor};
