use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer
/// renders these as the canonical `{"error": {...}}` body, keeping domain
/// errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Coarse error class exposed to API consumers
    fn error_type(&self) -> ErrorType;

    /// Machine-readable slug (e.g. `missing_parameter`)
    fn code(&self) -> &'static str;

    /// Offending request parameter, if any
    fn param(&self) -> Option<String> {
        None
    }

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String {
        self.to_string()
    }

    /// Build the canonical error envelope for this error
    fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorBody {
                message: self.client_message(),
                error_type: self.error_type(),
                param: self.param(),
                code: self.code().to_owned(),
            },
        }
    }
}

/// Error class: the caller's fault or ours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Malformed or unsupported caller input
    InvalidRequestError,
    /// Configuration, transport or upstream failure
    ServerError,
}

/// Wire shape of every error returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details
    pub error: ErrorBody,
}

/// Error details inside [`ErrorEnvelope`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description
    pub message: String,
    /// Error class
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    /// Offending parameter
    pub param: Option<String>,
    /// Fixed machine-readable slug
    pub code: String,
}

impl ErrorEnvelope {
    /// Build an envelope from raw parts
    pub fn new(error_type: ErrorType, code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                error_type,
                param: None,
                code: code.to_owned(),
            },
        }
    }
}
