//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Gemini client, failover chain and a test mock
//! - `http` - axum routes exposing the service

pub mod ai;
pub mod http;

pub use ai::{FailoverAIProvider, GeminiConfig, GeminiProvider};
pub use self::http::{build_router, AgronomyAppState};
