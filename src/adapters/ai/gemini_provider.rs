//! Gemini Provider - Implementation of AIProvider for Google's Generative Language API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! Images travel inline (base64) next to the prompt text in a single user
//! turn. The same client also backs [`ModelCatalog`] through the `models`
//! listing endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AiConfig;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ContentPart, FinishReason,
    MessageRole, ModelCatalog, ModelDescriptor, ProviderInfo, TokenUsage,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;
const MODELS_PAGE_SIZE: u32 = 100;
const MAX_MODEL_PAGES: usize = 50;

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API (default: https://generativelanguage.googleapis.com/v1beta).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Temperature used when the request does not set one.
    pub temperature: Option<f32>,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 0,
            temperature: None,
        }
    }

    /// Builds a configuration for one model from application settings.
    pub fn from_settings(ai: &AiConfig, api_key: &str, model: &str) -> Self {
        Self::new(api_key)
            .with_model(model)
            .with_base_url(ai.base_url.clone())
            .with_timeout(ai.timeout())
            .with_max_retries(ai.max_retries)
            .with_temperature(ai.temperature)
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the default temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::unavailable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Model this provider calls.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base(),
            self.config.model
        )
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.base())
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| Content {
                role: Some(
                    match msg.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: msg
                    .parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text(text) => Part::Text { text: text.clone() },
                        ContentPart::Image(image) => Part::InlineData {
                            inline_data: InlineData {
                                mime_type: image.mime_type.clone(),
                                data: STANDARD.encode(&image.data),
                            },
                        },
                    })
                    .collect(),
            })
            .collect();

        let system_instruction = request.system_prompt.as_ref().map(|prompt| Content {
            role: None,
            parts: vec![Part::Text {
                text: prompt.clone(),
            }],
        });

        let temperature = request.temperature.or(self.config.temperature);
        let generation_config = if temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let body = self.to_gemini_request(request);

        self.client
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> AIError {
        if e.is_timeout() {
            AIError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if e.is_connect() {
            AIError::network(format!("Connection failed: {}", e))
        } else {
            AIError::network(e.to_string())
        }
    }

    /// Passes successful responses through and maps failures to [`AIError`].
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(error_from_status(
            status.as_u16(),
            &error_body,
            &self.config.model,
        ))
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        completion_from_response(body, &self.config.model)
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(request).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut retry_count = 0;

        loop {
            tracing::debug!(
                model = %self.config.model,
                operation = request.metadata.operation,
                trace_id = %request.metadata.trace_id,
                images = request.image_count(),
                "sending generateContent request"
            );

            match self.attempt(&request).await {
                Ok(completion) => {
                    tracing::debug!(
                        model = %completion.model,
                        trace_id = %request.metadata.trace_id,
                        prompt_tokens = completion.usage.prompt_tokens,
                        completion_tokens = completion.usage.completion_tokens,
                        "generateContent succeeded"
                    );
                    return Ok(completion);
                }
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    let delay = retry_delay(retry_count, &err);
                    tracing::warn!(
                        model = %self.config.model,
                        trace_id = %request.metadata.trace_id,
                        attempt = retry_count + 1,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "retrying generateContent"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

/// Exponential backoff (1s, 2s, 4s, ... up to 32s). A rate limit waits at
/// least as long as the server asked.
fn retry_delay(retry_count: u32, err: &AIError) -> Duration {
    let backoff = Duration::from_secs(1 << retry_count.min(5));
    match err {
        AIError::RateLimited { retry_after_secs } => {
            backoff.max(Duration::from_secs(u64::from(*retry_after_secs)))
        }
        _ => backoff,
    }
}

#[async_trait]
impl ModelCatalog for GeminiProvider {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, AIError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_MODEL_PAGES {
            let mut query = vec![("pageSize", MODELS_PAGE_SIZE.to_string())];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let response = self
                .client
                .get(self.models_url())
                .header(API_KEY_HEADER, self.config.api_key())
                .query(&query)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;
            let response = self.handle_response_status(response).await?;

            let page: ListModelsResponse = response
                .json()
                .await
                .map_err(|e| AIError::parse(format!("Failed to parse model list: {}", e)))?;

            models.extend(page.models.into_iter().map(ModelDescriptor::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(models),
            }
        }

        tracing::warn!(pages = MAX_MODEL_PAGES, "model listing truncated");
        Ok(models)
    }
}

/// Builds a [`CompletionResponse`] from a decoded `generateContent` body.
fn completion_from_response(
    body: GenerateContentResponse,
    requested_model: &str,
) -> Result<CompletionResponse, AIError> {
    let usage = body
        .usage_metadata
        .map(|u| {
            let mut usage = TokenUsage::new(u.prompt_token_count, u.candidates_token_count);
            if u.total_token_count > 0 {
                usage.total_tokens = u.total_token_count;
            }
            usage
        })
        .unwrap_or_default();

    let Some(candidate) = body.candidates.into_iter().next() else {
        return match body.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(AIError::content_filtered(reason)),
            None => Err(AIError::parse("No candidates in response")),
        };
    };

    let finish_reason = match candidate.finish_reason.as_deref() {
        None | Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            FinishReason::ContentFilter
        }
        Some(_) => FinishReason::Other,
    };

    let content: String = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if content.is_empty() && finish_reason == FinishReason::ContentFilter {
        return Err(AIError::content_filtered(
            candidate.finish_reason.unwrap_or_default(),
        ));
    }

    Ok(CompletionResponse {
        content,
        usage,
        model: body
            .model_version
            .unwrap_or_else(|| requested_model.to_string()),
        finish_reason,
    })
}

/// Maps an unsuccessful HTTP status to an [`AIError`].
fn error_from_status(status: u16, body: &str, model: &str) -> AIError {
    let message = error_message(body);

    match status {
        400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
            AIError::AuthenticationFailed
        }
        400 => AIError::InvalidRequest(message),
        401 | 403 => AIError::AuthenticationFailed,
        404 => AIError::model_not_found(model),
        429 => AIError::rate_limited(parse_retry_after(body)),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, message)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, message)),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| body.chars().take(200).collect())
}

/// Reads the `RetryInfo.retryDelay` (e.g. `"37s"`) from an error body.
fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .into_iter()
        .flat_map(|e| e.error.details)
        .filter_map(|d| d.retry_delay)
        .find_map(|delay| {
            delay
                .trim()
                .strip_suffix('s')
                .and_then(|secs| secs.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(|secs| secs.ceil() as u32)
        })
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

/// Variant order matters for `#[serde(untagged)]`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    retry_delay: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<ApiModel> for ModelDescriptor {
    fn from(model: ApiModel) -> Self {
        Self {
            name: model.name,
            display_name: model.display_name,
            supported_generation_methods: model.supported_generation_methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ImagePart, RequestMetadata};
    use axum::{
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn provider(config: GeminiConfig) -> GeminiProvider {
        GeminiProvider::new(config).unwrap()
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new("test", "trace-1"))
    }

    fn decode(json: Value) -> GenerateContentResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("test-key")
            .with_model("gemini-2.0-flash")
            .with_base_url("http://localhost:9000/v1beta/")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(2)
            .with_temperature(Some(0.2));

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.api_key(), "test-key");

        let provider = provider(config);
        assert_eq!(
            provider.generate_url(),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(provider.models_url(), "http://localhost:9000/v1beta/models");
    }

    #[test]
    fn config_from_settings() {
        let ai = AiConfig {
            timeout_secs: 15,
            max_retries: 1,
            temperature: Some(0.3),
            ..AiConfig::default()
        };
        let config = GeminiConfig::from_settings(&ai, "k", "gemini-2.0-flash");

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, ai.base_url);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.temperature, Some(0.3));
    }

    #[test]
    fn config_debug_redacts_key() {
        let rendered = format!("{:?}", GeminiConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn image_request_serializes_inline_data() {
        let provider = provider(GeminiConfig::new("k"));
        let request = test_request()
            .with_image_message("Analyze", ImagePart::new("image/png", vec![1, 2, 3]))
            .with_max_tokens(256);

        let body = serde_json::to_value(provider.to_gemini_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze");
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "AQID");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body["generationConfig"].get("temperature").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn system_prompt_becomes_system_instruction() {
        let provider = provider(GeminiConfig::new("k"));
        let request = test_request()
            .with_system_prompt("You help farmers")
            .with_message(MessageRole::User, "Hi")
            .with_message(MessageRole::Assistant, "Hello")
            .with_temperature(0.4);

        let body = serde_json::to_value(provider.to_gemini_request(&request)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You help farmers");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][1]["role"], "model");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn config_temperature_applies_when_request_has_none() {
        let provider = provider(GeminiConfig::new("k").with_temperature(Some(0.5)));
        let body = serde_json::to_value(provider.to_gemini_request(&test_request())).unwrap();
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn plain_request_has_no_generation_config() {
        let provider = provider(GeminiConfig::new("k"));
        let body = serde_json::to_value(provider.to_gemini_request(&test_request())).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_parts_are_concatenated() {
        let body = decode(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "planning...", "thought": true},
                    {"text": "```json\n{\"disease\":"},
                    {"text": " \"Rust\"}\n```"}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 300, "candidatesTokenCount": 20, "totalTokenCount": 350},
            "modelVersion": "gemini-2.5-flash-001"
        }));

        let completion = completion_from_response(body, "gemini-2.5-flash").unwrap();
        assert_eq!(completion.content, "```json\n{\"disease\": \"Rust\"}\n```");
        assert_eq!(completion.finish_reason, FinishReason::Stop);
        assert_eq!(completion.model, "gemini-2.5-flash-001");
        assert_eq!(completion.usage.prompt_tokens, 300);
        assert_eq!(completion.usage.completion_tokens, 20);
        assert_eq!(completion.usage.total_tokens, 350);
    }

    #[test]
    fn missing_model_version_uses_requested_model() {
        let body = decode(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}, "finishReason": "MAX_TOKENS"}]
        }));
        let completion = completion_from_response(body, "gemini-2.0-flash").unwrap();
        assert_eq!(completion.model, "gemini-2.0-flash");
        assert_eq!(completion.finish_reason, FinishReason::Length);
        assert_eq!(completion.usage, TokenUsage::zero());
    }

    #[test]
    fn empty_candidate_text_is_returned_as_empty() {
        let body = decode(json!({"candidates": [{"finishReason": "STOP"}]}));
        let completion = completion_from_response(body, "m").unwrap();
        assert!(completion.content.is_empty());
    }

    #[test]
    fn blocked_prompt_is_content_filtered() {
        let body = decode(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let err = completion_from_response(body, "m").unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { reason } if reason == "SAFETY"));
    }

    #[test]
    fn safety_stop_without_text_is_content_filtered() {
        let body = decode(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        assert!(matches!(
            completion_from_response(body, "m"),
            Err(AIError::ContentFiltered { .. })
        ));
    }

    #[test]
    fn no_candidates_is_a_parse_error() {
        let body = decode(json!({}));
        assert!(matches!(
            completion_from_response(body, "m"),
            Err(AIError::Parse(_))
        ));
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert!(matches!(
            error_from_status(404, "{}", "gemini-x"),
            AIError::ModelNotFound { model } if model == "gemini-x"
        ));
        assert!(matches!(
            error_from_status(403, "", "m"),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            error_from_status(503, "", "m"),
            AIError::Unavailable { .. }
        ));
        assert!(matches!(
            error_from_status(418, "", "m"),
            AIError::Network(_)
        ));

        let bad = r#"{"error": {"code": 400, "message": "Unsupported MIME type", "status": "INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            error_from_status(400, bad, "m"),
            AIError::InvalidRequest(msg) if msg == "Unsupported MIME type"
        ));
    }

    #[test]
    fn invalid_api_key_maps_to_authentication_failed() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT", "details": [{"reason": "API_KEY_INVALID"}]}}"#;
        assert!(matches!(
            error_from_status(400, body, "m"),
            AIError::AuthenticationFailed
        ));
    }

    #[test]
    fn parse_retry_after_from_retry_info() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "details": [
            {"@type": "type.googleapis.com/google.rpc.QuotaFailure"},
            {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "36.2s"}
        ]}}"#;
        assert_eq!(parse_retry_after(body), 37);
        assert!(matches!(
            error_from_status(429, body, "m"),
            AIError::RateLimited { retry_after_secs: 37 }
        ));
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(parse_retry_after(r#"{"error": {"message": "slow down"}}"#), 30);
        assert_eq!(parse_retry_after("not json"), 30);
    }

    #[test]
    fn retry_delay_backs_off_exponentially() {
        let err = AIError::unavailable("overloaded");
        assert_eq!(retry_delay(0, &err), Duration::from_secs(1));
        assert_eq!(retry_delay(2, &err), Duration::from_secs(4));
        assert_eq!(retry_delay(9, &err), Duration::from_secs(32));
    }

    #[test]
    fn retry_delay_honours_rate_limit_hint() {
        assert_eq!(retry_delay(0, &AIError::rate_limited(17)), Duration::from_secs(17));
        assert_eq!(retry_delay(3, &AIError::rate_limited(2)), Duration::from_secs(8));
    }

    #[test]
    fn provider_info_names_the_model() {
        let info = provider(GeminiConfig::new("k").with_model("gemini-2.0-flash")).provider_info();
        assert_eq!(info.name, "gemini");
        assert_eq!(info.model, "gemini-2.0-flash");
    }

    // ───────────────────────────────────────────────────────────────
    // Round trips against a local stand-in for the API
    // ───────────────────────────────────────────────────────────────

    async fn generate(
        Path(model_action): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) != Some("good-key") {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": {"code": 403, "message": "denied"}})),
            );
        }
        if !model_action.starts_with("gemini-2.5-flash:") {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"code": 404, "message": "not found"}})),
            );
        }
        let prompt = body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        (
            StatusCode::OK,
            Json(json!({
                "candidates": [{"content": {"parts": [{"text": format!("echo: {prompt}")}]}, "finishReason": "STOP"}]
            })),
        )
    }

    async fn models(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        match params.get("pageToken").map(String::as_str) {
            None => Json(json!({
                "models": [{"name": "models/gemini-2.5-flash", "displayName": "Gemini 2.5 Flash",
                            "supportedGenerationMethods": ["generateContent", "countTokens"]}],
                "nextPageToken": "page-2"
            })),
            Some(_) => Json(json!({
                "models": [{"name": "models/text-embedding-004", "displayName": "Text Embedding 004",
                            "supportedGenerationMethods": ["embedContent"]}]
            })),
        }
    }

    async fn spawn_stand_in() -> String {
        let app = Router::new()
            .route("/v1beta/models/:model_action", post(generate))
            .route("/v1beta/models", get(models));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    #[tokio::test]
    async fn complete_round_trip() {
        let base = spawn_stand_in().await;
        let provider = provider(GeminiConfig::new("good-key").with_base_url(base));

        let completion = provider
            .complete(test_request().with_message(MessageRole::User, "hello"))
            .await
            .unwrap();

        assert_eq!(completion.content, "echo: hello");
    }

    #[tokio::test]
    async fn unknown_model_round_trip() {
        let base = spawn_stand_in().await;
        let provider = provider(
            GeminiConfig::new("good-key")
                .with_base_url(base)
                .with_model("gemini-9-ultra"),
        );

        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn rejected_key_round_trip() {
        let base = spawn_stand_in().await;
        let provider = provider(GeminiConfig::new("bad-key").with_base_url(base));

        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(matches!(err, AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn list_models_follows_pages() {
        let base = spawn_stand_in().await;
        let provider = provider(GeminiConfig::new("good-key").with_base_url(base));

        let models = provider.list_models().await.unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].short_name(), "gemini-2.5-flash");
        assert!(models[0].supports_generate_content());
        assert!(!models[1].supports_generate_content());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let provider = provider(
            GeminiConfig::new("k")
                .with_base_url("http://127.0.0.1:1/v1beta")
                .with_timeout(Duration::from_secs(2)),
        );
        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
