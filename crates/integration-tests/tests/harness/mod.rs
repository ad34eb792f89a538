#![allow(dead_code)]

pub mod config;
pub mod mock_upstream;
pub mod server;

/// Minimal valid chat request body
pub fn chat_body(model: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {"role": "system", "content": "You are terse."},
            {"role": "user", "content": "Hello"}
        ]
    })
}

/// Chat request body with `stream: true`
pub fn stream_body(model: &str) -> serde_json::Value {
    let mut body = chat_body(model);
    body["stream"] = serde_json::Value::Bool(true);
    body
}
