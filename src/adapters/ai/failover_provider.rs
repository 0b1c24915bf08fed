//! Failover AI Provider - Wrapper that walks an ordered chain of providers.
//!
//! When a provider fails with an error another model may not hit (rate
//! limit, outage, unknown model), the next provider in the chain is tried.
//! Any other error is returned immediately.
//!
//! # Example
//!
//! ```ignore
//! let primary = GeminiProvider::new(config.clone().with_model("gemini-2.5-flash"))?;
//! let fallback = GeminiProvider::new(config.with_model("gemini-2.0-flash"))?;
//!
//! let provider = FailoverAIProvider::new(Arc::new(primary))
//!     .with_fallback(Arc::new(fallback));
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover support.
pub struct FailoverAIProvider {
    chain: Vec<Arc<dyn AIProvider>>,
}

impl FailoverAIProvider {
    /// Creates a new failover provider with only a primary provider.
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            chain: vec![primary],
        }
    }

    /// Appends a fallback provider to the chain.
    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.chain.push(fallback);
        self
    }

    /// Builds a chain from an ordered list. Returns `None` when the list is empty.
    pub fn from_chain(chain: Vec<Arc<dyn AIProvider>>) -> Option<Self> {
        if chain.is_empty() {
            None
        } else {
            Some(Self { chain })
        }
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut last_error = None;

        for (position, provider) in self.chain.iter().enumerate() {
            match provider.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.should_failover() && position + 1 < self.chain.len() => {
                    let failed = provider.provider_info();
                    let next = self.chain[position + 1].provider_info();
                    tracing::warn!(
                        failed_model = %failed.model,
                        fallback_model = %next.model,
                        trace_id = %request.metadata.trace_id,
                        error = %err,
                        "model failed, falling back"
                    );
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or_else(|| AIError::unavailable("no AI provider configured")))
    }

    fn provider_info(&self) -> ProviderInfo {
        self.chain
            .first()
            .map(|p| p.provider_info())
            .unwrap_or_else(|| ProviderInfo::new("none", "none"))
    }
}
