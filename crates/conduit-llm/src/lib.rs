//! Translation core of the Conduit gateway
//!
//! Routes a canonical (OpenAI-shaped) chat request to one of the `OpenAI`,
//! Anthropic, Google or xAI upstreams by model prefix, translates the
//! request and buffered response between schemas, and relays streamed
//! responses byte for byte.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod dispatch;
pub mod error;
#[cfg(feature = "http")]
pub mod handler;
pub mod protocol;
pub mod provider;
pub mod relay;
pub mod routing;
pub mod state;
pub mod types;

pub use conduit_config::ProviderKind;
pub use dispatch::{Dispatched, Dispatcher};
pub use error::LlmError;
#[cfg(feature = "http")]
pub use handler::llm_router;
pub use provider::ProviderAdapter;
pub use relay::RelayStream;
pub use routing::ModelRouter;
pub use state::LlmState;
pub use types::{ChatRequest, ChatResponse, Choice, Message, Role, Usage};
