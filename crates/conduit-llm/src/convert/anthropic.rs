//! Conversion between canonical types and Anthropic wire format

use crate::protocol::anthropic::{AnthropicMessage, AnthropicRequest, AnthropicResponse};
use crate::types::{ChatRequest, ChatResponse, Role, Usage};

/// Default max tokens when not specified (Anthropic requires this field)
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

// -- Outbound: canonical -> Anthropic wire format --

impl From<&ChatRequest> for AnthropicRequest {
    fn from(req: &ChatRequest) -> Self {
        let mut system = None;
        let mut messages = Vec::with_capacity(req.messages.len());

        for msg in &req.messages {
            let role = match msg.role {
                Role::System => {
                    // Only the first system message becomes the system prompt
                    if system.is_none() {
                        system = Some(msg.text().to_owned());
                    } else {
                        tracing::debug!(model = %req.model, "dropping additional system message");
                    }
                    continue;
                }
                Role::User => "user",
                Role::Assistant => "assistant",
            };

            messages.push(AnthropicMessage {
                role,
                content: msg.text().to_owned(),
            });
        }

        Self {
            model: req.model.clone(),
            max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system,
            messages,
            temperature: req.temperature,
            stream: req.stream,
        }
    }
}

// -- Inbound: Anthropic wire format -> canonical --

impl AnthropicResponse {
    /// Convert to a canonical response, echoing the requested model
    pub fn into_chat_response(self, model: &str) -> ChatResponse {
        let content = self
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .unwrap_or_default();
        let usage = Usage::new(self.usage.input_tokens, self.usage.output_tokens);

        let mut response = ChatResponse::single(model, content, self.stop_reason.unwrap_or_default(), usage);
        if !self.id.is_empty() {
            response.id = self.id;
        }
        response
    }
}
