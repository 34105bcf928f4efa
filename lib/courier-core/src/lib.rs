//! Core types and traits for the courier HTTP client proxy.
//!
//! This crate provides the foundational types used by courier:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types (with cookies)
//! - [`Response`] - HTTP response type, plus streaming support
//! - [`Error`] and [`Result`] - Error handling
//! - [`RestError`] - Wire model for decoded error bodies
//! - [`ErrorDecoder`] - Trait turning rejected responses into errors
//! - [`HttpClient`] / [`HttpClientStreaming`] - Client execution traits
//! - [`ContentType`] - Body content types and serialization helpers

mod body;
mod client;
mod error;
mod method;
pub mod prelude;
mod request;
mod response;

pub use body::{ContentType, from_json, to_form, to_json, to_query_string};
pub use client::{HttpClient, HttpClientStreaming};
pub use error::{Error, ErrorDecoder, Result, RestError};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use response::streaming::{StreamingBody, StreamingResponse, lines};

// Re-export http crate status codes for client implementations
pub use http::StatusCode;
