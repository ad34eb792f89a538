//! Static model catalogue in the `OpenAI` list shape

use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde::Serialize;

use crate::error::ServerError;

/// A catalogue entry
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub object: &'static str,
    pub created: u64,
    pub owned_by: &'static str,
    pub permission: &'static [&'static str],
    pub root: &'static str,
    pub parent: Option<&'static str>,
}

impl ModelInfo {
    const fn new(id: &'static str, created: u64, owned_by: &'static str) -> Self {
        Self {
            id,
            object: "model",
            created,
            owned_by,
            permission: &[],
            root: id,
            parent: None,
        }
    }
}

/// Models advertised by `GET /v1/models`
///
/// Informational only; routing accepts any id with a known prefix.
pub const CATALOGUE: &[ModelInfo] = &[
    ModelInfo::new("gpt-3.5-turbo", 1_677_610_602, "openai"),
    ModelInfo::new("gpt-4", 1_687_882_411, "openai"),
    ModelInfo::new("gpt-4-turbo-preview", 1_706_037_777, "openai"),
    ModelInfo::new("claude-3-5-sonnet-20241022", 1_729_555_200, "anthropic"),
    ModelInfo::new("gemini-1.5-pro", 1_715_731_200, "google"),
    ModelInfo::new("grok-beta", 1_729_468_800, "xai"),
];

#[derive(Serialize)]
struct ModelList {
    object: &'static str,
    data: &'static [ModelInfo],
}

pub fn models_router() -> Router {
    Router::new()
        .route("/v1/models", routing::get(list_models))
        .route("/v1/models/{id}", routing::get(get_model))
}

/// Handle `GET /v1/models`
async fn list_models() -> Response {
    Json(ModelList {
        object: "list",
        data: CATALOGUE,
    })
    .into_response()
}

/// Handle `GET /v1/models/{id}`
async fn get_model(Path(id): Path<String>) -> Response {
    match CATALOGUE.iter().find(|model| model.id == id) {
        Some(model) => Json(model).into_response(),
        None => conduit_llm::handler::error_response(&ServerError::ModelNotFound { id }),
    }
}
