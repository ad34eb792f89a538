//! Conversion between canonical types and Google wire format

use crate::protocol::google::{GoogleContent, GoogleGenerationConfig, GooglePart, GoogleRequest, GoogleResponse};
use crate::types::{ChatRequest, ChatResponse, Role, Usage};

/// Finish reason reported when the upstream gives none
const DEFAULT_FINISH_REASON: &str = "stop";

// -- Outbound: canonical -> Google wire format --

impl From<&ChatRequest> for GoogleRequest {
    fn from(req: &ChatRequest) -> Self {
        let contents = req
            .messages
            .iter()
            .map(|msg| GoogleContent {
                role: Some(google_role(msg.role).to_owned()),
                parts: vec![GooglePart {
                    text: Some(msg.text().to_owned()),
                }],
            })
            .collect();

        Self {
            contents,
            generation_config: req
                .temperature
                .map(|temperature| GoogleGenerationConfig { temperature }),
        }
    }
}

/// Google has no system role; system text is sent as a user turn
const fn google_role(role: Role) -> &'static str {
    match role {
        Role::System | Role::User => "user",
        Role::Assistant => "model",
    }
}

// -- Inbound: Google wire format -> canonical --

impl GoogleResponse {
    /// Convert to a canonical response, echoing the requested model
    ///
    /// Google does not report usage here, so all counts are zero.
    pub fn into_chat_response(self, model: &str) -> ChatResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return ChatResponse::single(model, "", DEFAULT_FINISH_REASON, Usage::default());
        };

        let content = candidate
            .content
            .parts
            .into_iter()
            .next()
            .and_then(|part| part.text)
            .unwrap_or_default();
        let finish_reason = candidate
            .finish_reason
            .map_or_else(|| DEFAULT_FINISH_REASON.to_owned(), |r| r.to_ascii_lowercase());

        ChatResponse::single(model, content, finish_reason, Usage::default())
    }
}
