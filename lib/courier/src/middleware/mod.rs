//! Tower middleware layers for the courier HTTP client.
//!
//! Layers compose over the client via [`crate::HyperClientBuilder::layer`];
//! the first layer added is the outermost one. Anything the proxy layer
//! deliberately does not do (authentication, logging, timeouts, retries)
//! belongs here, on the client collaborator.
//!
//! # Available Layers
//!
//! - [`BearerAuthLayer`] - Adds `Authorization: Bearer <token>` header
//! - [`BasicAuthLayer`] - Adds `Authorization: Basic <base64>` header
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Tower's own layers ([`ConcurrencyLimitLayer`], ...) compose the same way.
//!
//! # Example
//!
//! ```ignore
//! use courier::HyperClient;
//!
//! let client = HyperClient::builder()
//!     .with_bearer_auth("my-token")
//!     .with_logging()
//!     .build();
//! ```

mod basic_auth;
mod bearer_auth;
mod logging;

pub use basic_auth::{BasicAuth, BasicAuthLayer};
pub use bearer_auth::{BearerAuth, BearerAuthLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
