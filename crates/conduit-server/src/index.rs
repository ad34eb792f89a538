use axum::Json;
use serde_json::{Value, json};

/// Service information for `GET /`
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Conduit LLM gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat_completions": "/v1/chat/completions",
            "models": "/v1/models"
        }
    }))
}
