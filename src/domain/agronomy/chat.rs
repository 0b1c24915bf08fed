//! Farming assistant replies.

use serde::{Deserialize, Serialize};

/// Name used when the client does not send one.
pub const DEFAULT_USER_NAME: &str = "Farmer";

/// Reply sent back to the chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub success: bool,
}

impl ChatReply {
    /// A reply produced by the model.
    pub fn answered(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            success: true,
        }
    }

    /// No model is configured.
    pub fn not_connected() -> Self {
        Self {
            reply: "I'm having trouble connecting right now. Please try again!".to_string(),
            success: false,
        }
    }

    /// The model answered with no text.
    pub fn empty_reply(user_name: &str) -> Self {
        Self {
            reply: format!(
                "I'm sorry {user_name}, I couldn't generate a response. Could you rephrase your question?"
            ),
            success: false,
        }
    }

    /// The model call failed.
    pub fn unavailable(user_name: &str) -> Self {
        Self {
            reply: format!(
                "I apologize {user_name}, but I'm having trouble right now. As your farming \
                 assistant, I'm here to help with crops, soil, diseases, and farming techniques. \
                 Please try asking again!"
            ),
            success: false,
        }
    }
}
