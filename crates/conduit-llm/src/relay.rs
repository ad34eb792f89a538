//! Byte-for-byte relay of a streamed upstream response
//!
//! Chunks are forwarded in arrival order without parsing or re-framing, so
//! the caller receives the provider's native stream format. Dropping the
//! relay drops the upstream body, which closes the upstream connection.

use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use conduit_config::ProviderKind;
use futures_util::{Stream, StreamExt};
use http::HeaderValue;

use crate::error::LlmError;

type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, LlmError>> + Send>>;

/// Streamed upstream body being relayed to the caller
pub struct RelayStream {
    provider: ProviderKind,
    content_type: Option<HeaderValue>,
    inner: ChunkStream,
    chunks: u64,
    bytes: u64,
    finished: bool,
}

impl RelayStream {
    /// Wrap an upstream byte stream
    ///
    /// Transport errors are reported as [`LlmError::Streaming`] and end the
    /// relay.
    pub fn new<S, E>(provider: ProviderKind, content_type: Option<HeaderValue>, upstream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Display,
    {
        Self {
            provider,
            content_type,
            inner: Box::pin(upstream.map(|chunk| chunk.map_err(|e| LlmError::Streaming(e.to_string())))),
            chunks: 0,
            bytes: 0,
            finished: false,
        }
    }

    /// Upstream provider being relayed
    pub const fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// `Content-Type` the upstream declared, if any
    pub const fn content_type(&self) -> Option<&HeaderValue> {
        self.content_type.as_ref()
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.chunks += 1;
                this.bytes += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                tracing::warn!(
                    provider = %this.provider,
                    chunks = this.chunks,
                    bytes = this.bytes,
                    error = %e,
                    "upstream stream failed"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                tracing::debug!(
                    provider = %this.provider,
                    chunks = this.chunks,
                    bytes = this.bytes,
                    "upstream stream completed"
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(
                provider = %self.provider,
                chunks = self.chunks,
                bytes = self.bytes,
                "caller disconnected, closing upstream stream"
            );
        }
    }
}
