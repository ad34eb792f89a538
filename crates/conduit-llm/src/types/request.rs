use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::Message;

/// Canonical chat completion request
///
/// `model` and `messages` default to empty when absent so that the
/// dispatcher, not the JSON extractor, reports them as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier, routed by prefix
    #[serde(default)]
    pub model: String,
    /// Conversation messages in caller order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Any other caller fields, forwarded only by pass-through adapters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    /// Create a non-streaming request with no sampling overrides
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Self::default()
        }
    }
}
