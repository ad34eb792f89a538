use conduit_core::{ErrorType, HttpError};
use http::StatusCode;
use thiserror::Error;

/// Errors raised by the routes around the translation core
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Missing Authorization header")]
    MissingAuthorization,

    #[error("Invalid Authorization header format. Expected 'Bearer <API_KEY>'")]
    MalformedAuthorization,

    #[error("Invalid API key provided")]
    InvalidApiKey,

    /// Requested model is not in the catalogue
    #[error("Model '{id}' not found")]
    ModelNotFound { id: String },

    /// No route matched
    #[error("Endpoint not found")]
    EndpointNotFound,
}

impl HttpError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuthorization | Self::MalformedAuthorization | Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::ModelNotFound { .. } | Self::EndpointNotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_type(&self) -> ErrorType {
        ErrorType::InvalidRequestError
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingAuthorization | Self::MalformedAuthorization | Self::InvalidApiKey => "invalid_api_key",
            Self::ModelNotFound { .. } => "model_not_found",
            Self::EndpointNotFound => "not_found",
        }
    }
}
