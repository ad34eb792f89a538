//! Canonical request/response types
//!
//! The gateway's public schema. Every provider adapter converts to and
//! from these shapes.

pub mod message;
pub mod request;
pub mod response;

pub use message::{Message, Role};
pub use request::ChatRequest;
pub use response::{ChatResponse, Choice, Usage};

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value
///
/// Upstreams send `"content": null` or `"finish_reason": null` in places the
/// canonical schema models as plain values.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
