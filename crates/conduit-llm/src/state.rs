//! Shared state for LLM route handlers

use std::sync::Arc;

use conduit_config::LlmConfig;

use crate::dispatch::Dispatcher;
use crate::error::LlmError;

/// Cheaply clonable handle to the dispatcher
#[derive(Clone)]
pub struct LlmState {
    inner: Arc<Dispatcher>,
}

impl LlmState {
    /// Build state from upstream configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self::new(Dispatcher::from_config(config)?))
    }

    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner
    }
}
