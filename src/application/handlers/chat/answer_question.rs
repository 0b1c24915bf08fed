//! AnswerQuestionHandler - Farming assistant chat.

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::DEFAULT_MODEL_DEADLINE;
use crate::domain::agronomy::{prompts, ChatReply, DEFAULT_USER_NAME};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

const OPERATION: &str = "chat";

/// Command to answer one farmer question.
#[derive(Debug, Clone)]
pub struct AnswerQuestionCommand {
    pub message: String,
    pub user_name: String,
}

impl AnswerQuestionCommand {
    /// Blank names fall back to the default.
    pub fn new(message: impl Into<String>, user_name: Option<String>) -> Self {
        let user_name = user_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());

        Self {
            message: message.into(),
            user_name,
        }
    }
}

/// Handler for chat questions. Never fails.
pub struct AnswerQuestionHandler {
    provider: Option<Arc<dyn AIProvider>>,
    deadline: Duration,
}

impl AnswerQuestionHandler {
    pub fn new(provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self {
            provider,
            deadline: DEFAULT_MODEL_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn handle(&self, cmd: AnswerQuestionCommand) -> ChatReply {
        let Some(provider) = self.provider.as_ref() else {
            tracing::warn!(operation = OPERATION, "AI model not initialized");
            return ChatReply::not_connected();
        };

        let metadata = RequestMetadata::generate(OPERATION);
        let trace_id = metadata.trace_id.clone();
        tracing::info!(
            %trace_id,
            user = %cmd.user_name,
            chars = cmd.message.chars().count(),
            "chat question received"
        );

        let request = CompletionRequest::new(metadata)
            .with_system_prompt(prompts::chat_system_prompt(&cmd.user_name))
            .with_message(
                MessageRole::User,
                prompts::chat_question(&cmd.user_name, &cmd.message),
            );

        let Ok(completion) = tokio::time::timeout(self.deadline, provider.complete(request)).await
        else {
            tracing::error!(
                %trace_id,
                deadline_ms = self.deadline.as_millis() as u64,
                "chat completion exceeded deadline"
            );
            return ChatReply::unavailable(&cmd.user_name);
        };

        match completion {
            Ok(response) => {
                let text = response.content.trim();
                if text.is_empty() {
                    tracing::warn!(%trace_id, model = %response.model, "empty chat reply");
                    ChatReply::empty_reply(&cmd.user_name)
                } else {
                    tracing::info!(%trace_id, chars = text.chars().count(), "chat reply generated");
                    ChatReply::answered(text)
                }
            }
            Err(err) => {
                tracing::error!(%trace_id, error = %err, "chat completion failed");
                ChatReply::unavailable(&cmd.user_name)
            }
        }
    }
}
