use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::Message;

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub completion_tokens: u32,
    /// Prompt plus completion
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_tokens: u32,
    /// Fields the canonical schema does not model (e.g. `prompt_tokens_details`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Usage {
    /// Build usage from prompt and completion counts
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
            extra: Map::new(),
        }
    }
}

/// A single completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice
    #[serde(default)]
    pub index: u32,
    /// Generated message
    pub message: Message,
    /// Why generation stopped, as reported upstream
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub finish_reason: String,
    /// Fields the canonical schema does not model (e.g. `logprobs`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Unique response identifier
    #[serde(default)]
    pub id: String,
    /// Object type, `chat.completion`
    #[serde(default = "default_object")]
    pub object: String,
    /// Unix timestamp of creation
    #[serde(default)]
    pub created: u64,
    /// Model that served the request
    #[serde(default)]
    pub model: String,
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub usage: Usage,
    /// Fields the canonical schema does not model (e.g. `system_fingerprint`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatResponse {
    /// Build a single-choice assistant response with a fresh id
    pub fn single(
        model: impl Into<String>,
        content: impl Into<String>,
        finish_reason: impl Into<String>,
        usage: Usage,
    ) -> Self {
        Self {
            id: format!("chatcmpl-{}", uuid::Uuid::new_v4().simple()),
            object: default_object(),
            created: now_secs(),
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(content),
                finish_reason: finish_reason.into(),
                extra: Map::new(),
            }],
            usage,
            extra: Map::new(),
        }
    }

    /// Text of the first choice, or empty
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
    }
}

fn default_object() -> String {
    "chat.completion".to_owned()
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
