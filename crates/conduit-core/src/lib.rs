//! Shared vocabulary for Conduit feature crates

#![allow(clippy::must_use_candidate)]

mod error;

pub use error::{ErrorBody, ErrorEnvelope, ErrorType, HttpError};
