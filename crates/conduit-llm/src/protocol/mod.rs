//! Provider-specific wire format types
//!
//! `OpenAI` and xAI speak the canonical schema directly and have no module
//! here.

pub mod anthropic;
pub mod google;
