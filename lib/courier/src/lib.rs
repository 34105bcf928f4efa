//! Contract-driven HTTP client proxy for Rust.
//!
//! Describe an API interface as an explicit [`Contract`], attach behavior
//! bundles ([`InvocationFns`]), and build a [`Proxy`] that turns method
//! invocations into HTTP exchanges over any [`HttpClient`].
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! trait UserApi {
//!     fn get_user(&self, id: u64) -> BoxFuture<'_, courier::Result<User>>;
//! }
//!
//! let contract = Contract::builder::<dyn UserApi>()
//!     .method(
//!         MethodContract::get("get_user", "/users/{id}")
//!             .param(Param::path("id", "u64"))
//!             .produces(ContentType::Json),
//!     )
//!     .build()?;
//!
//! let proxy = ProxyBuilder::new()
//!     .client(HyperClient::new())
//!     .base_url("https://api.example.com")
//!     .common_fns(InvocationFns::standard())
//!     .build(contract)?;
//!
//! let user: User = proxy
//!     .invoke(&MethodDescriptor::new("get_user", ["u64"]), vec![42_u64.into()])
//!     .await?;
//! ```

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
pub mod proxy;

// Re-export client types
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};

// Re-export the proxy surface at the crate root
pub use proxy::{
    ArgValue, Binding, Contract, ContractBuilder, InvocationFns, InvocationFnsBuilder,
    InvocationParameters, MessageAwareErrorDecoder, MethodContract, MethodDescriptor, Param,
    Proxy, ProxyBuilder, RestErrorDecoder, ReturnKind,
};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    ContentType, Error, ErrorDecoder, HttpClient, HttpClientStreaming, Method, Request,
    RequestBuilder, Response, RestError, Result, StatusCode, from_json, to_form, to_json,
    to_query_string,
};
pub use courier_core::{StreamingBody, StreamingResponse};

// Re-export url for base URL handling
pub use url;
