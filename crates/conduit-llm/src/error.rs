//! Error taxonomy for chat completion requests

use conduit_config::ProviderKind;
use conduit_core::{ErrorType, HttpError};
use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while serving a chat completion
#[derive(Debug, Error)]
pub enum LlmError {
    /// A required request field is absent or empty
    #[error("Missing required parameter: '{param}'")]
    MissingParameter { param: &'static str },

    /// No routing prefix matches the requested model
    #[error("Model '{model}' is not supported")]
    ModelNotSupported { model: String },

    /// The routed provider has no credential configured
    #[error("API key for provider '{provider}' is not configured")]
    ApiKeyNotConfigured { provider: ProviderKind },

    /// Request body is not valid JSON for the canonical schema
    #[error("Invalid request body: {0}")]
    InvalidJson(String),

    /// Upstream answered with an error status or error payload
    #[error("Upstream provider error: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Upstream could not be reached or answered with an unusable body
    #[error("Error forwarding request: {0}")]
    Forwarding(String),

    /// Upstream stream failed after the response started
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter { .. } | Self::ModelNotSupported { .. } | Self::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Upstream { status, .. } => *status,
            Self::ApiKeyNotConfigured { .. } | Self::Forwarding(_) | Self::Streaming(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> ErrorType {
        match self {
            Self::MissingParameter { .. } | Self::ModelNotSupported { .. } | Self::InvalidJson(_) => {
                ErrorType::InvalidRequestError
            }
            Self::Upstream { status, .. } if status.is_client_error() => ErrorType::InvalidRequestError,
            _ => ErrorType::ServerError,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "missing_parameter",
            Self::ModelNotSupported { .. } => "model_not_supported",
            Self::ApiKeyNotConfigured { .. } => "api_key_not_configured",
            Self::InvalidJson(_) => "invalid_json",
            Self::Upstream { .. } => "upstream_error",
            Self::Forwarding(_) | Self::Streaming(_) => "forwarding_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn param(&self) -> Option<String> {
        match self {
            Self::MissingParameter { param } => Some((*param).to_owned()),
            Self::ModelNotSupported { model } => Some(model.clone()),
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
