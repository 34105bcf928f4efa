//! HTTP client traits.
//!
//! - [`HttpClient`] - Buffered HTTP execution
//! - [`HttpClientStreaming`] - Chunked streaming execution
//!
//! These traits are the seam between the proxy dispatcher and the transport:
//! the dispatcher builds a [`Request`] and hands it over; connection
//! handling, TLS, timeouts, and retries all live behind this seam.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result, response::streaming::StreamingResponse};

/// Core HTTP client trait.
///
/// Implementations should be async-first and support connection pooling.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// Streaming HTTP client trait.
///
/// Extends [`HttpClient`] with a streaming execution mode whose response
/// body yields chunks as they arrive from the server.
pub trait HttpClientStreaming: HttpClient {
    /// Execute an HTTP request and return a streaming response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails before the response head is
    /// received; body-read errors surface through the returned stream.
    fn execute_streaming(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<StreamingResponse>> + Send;
}
