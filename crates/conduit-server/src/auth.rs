use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use conduit_llm::handler::error_response;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ServerError;

/// Paths that never require the gateway key
#[derive(Debug, Clone)]
pub struct PublicPaths {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl PublicPaths {
    /// `exact` must match the whole path; `prefixes` match its start
    pub const fn new(exact: Vec<String>, prefixes: Vec<String>) -> Self {
        Self { exact, prefixes }
    }

    fn contains(&self, path: &str) -> bool {
        self.exact.iter().any(|p| p == path) || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Require `Authorization: Bearer <api_key>` outside the public paths
pub async fn auth_middleware(api_key: SecretString, public: PublicPaths, request: Request, next: Next) -> Response {
    if public.contains(request.uri().path()) {
        return next.run(request).await;
    }

    if let Err(e) = check_authorization(&api_key, &request) {
        tracing::debug!(path = %request.uri().path(), error = %e, "gateway authentication failed");
        return error_response(&e);
    }

    next.run(request).await
}

fn check_authorization(api_key: &SecretString, request: &Request) -> Result<(), ServerError> {
    let header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(ServerError::MissingAuthorization)?;

    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ServerError::MalformedAuthorization)?;

    if token != api_key.expose_secret() {
        return Err(ServerError::InvalidApiKey);
    }

    Ok(())
}
