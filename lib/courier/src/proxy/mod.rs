//! Contract-driven HTTP client proxies.
//!
//! A [`Proxy`] turns an interface [`Contract`] into live HTTP exchanges: one
//! concrete implementing type per decorated interface delegates each method
//! to [`Proxy::invoke`] (or one of its siblings), and the dispatcher drives
//! the configured [`HttpClient`] through the method's invocation-function
//! bundle.
//!
//! All configuration is validated when the proxy is built: the target must
//! be an interface, every method must resolve to a complete bundle, and
//! per-method bundles must match declared methods. After that the proxy is
//! read-only; concurrent callers share it freely.
//!
//! # Example
//!
//! The decorated interface is a dyn-compatible trait whose methods return
//! deferred values; the implementing type delegates to the proxy.
//!
//! ```ignore
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
//! struct UserApiClient {
//!     proxy: Proxy<HyperClient>,
//!     get_user: MethodDescriptor,
//! }
//!
//! impl UserApi for UserApiClient {
//!     fn get_user(&self, id: u64) -> BoxFuture<'_, courier::Result<User>> {
//!         Box::pin(async move { self.proxy.invoke(&self.get_user, vec![id.into()]).await })
//!     }
//! }
//! ```

mod body;
mod contract;
mod cookies;
mod decoder;
mod descriptor;
mod detector;
mod fns;
mod headers;
mod invocation;
mod response;
mod uri;

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use courier_core::{Error, HttpClient, HttpClientStreaming, Request, Response, Result};
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

pub use self::body::{BodyInserter, SerializingBodyInserter};
pub use self::contract::{Binding, Contract, ContractBuilder, MethodContract, Param, ReturnKind};
pub use self::cookies::{ContractCookiesBuilder, CookiesBuilder};
pub use self::decoder::{MessageAwareErrorDecoder, RestErrorDecoder};
pub use self::descriptor::MethodDescriptor;
pub use self::detector::{DefaultErrorDetector, ErrorDetector};
pub use self::fns::{InvocationFns, InvocationFnsBuilder};
pub use self::headers::{ContractHeadersBuilder, HeadersBuilder};
pub use self::invocation::{ArgValue, InvocationParameters};
pub use self::response::{PayloadResponseBuilder, ResponseBuilder};
pub use self::uri::{TemplateUriBuilder, UriBuilder};

use self::fns::ResolvedInvocationFns;

// ============================================================================
// Proxy Builder
// ============================================================================

/// Builder for [`Proxy`].
pub struct ProxyBuilder<C> {
    client: Option<C>,
    base_url: Option<String>,
    common_fns: Option<InvocationFns>,
    method_fns: HashMap<MethodDescriptor, InvocationFns>,
}

impl<C> Default for ProxyBuilder<C> {
    fn default() -> Self {
        Self {
            client: None,
            base_url: None,
            common_fns: None,
            method_fns: HashMap::new(),
        }
    }
}

impl<C> std::fmt::Debug for ProxyBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyBuilder")
            .field("has_client", &self.client.is_some())
            .field("base_url", &self.base_url)
            .field("common_fns", &self.common_fns)
            .field("method_fns", &self.method_fns.len())
            .finish()
    }
}

impl<C: HttpClient> ProxyBuilder<C> {
    /// Creates an empty proxy builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP client collaborator.
    #[must_use]
    pub fn client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the base URL every method path is resolved against.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the common bundle applied to every method.
    #[must_use]
    pub fn common_fns(mut self, fns: InvocationFns) -> Self {
        self.common_fns = Some(fns);
        self
    }

    /// Sets a per-method bundle overriding the common bundle field by field.
    #[must_use]
    pub fn method_fns(mut self, descriptor: MethodDescriptor, fns: InvocationFns) -> Self {
        self.method_fns.insert(descriptor, fns);
        self
    }

    /// Builds the proxy for the given contract.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the client or base URL is missing,
    /// the target is not an interface, a per-method bundle names an unknown
    /// method, or any method does not resolve to a complete bundle.
    pub fn build(self, contract: Contract) -> Result<Proxy<C>> {
        let client = self
            .client
            .ok_or_else(|| Error::contract("no HTTP client configured"))?;
        let base_url = self
            .base_url
            .ok_or_else(|| Error::contract("no base URL configured"))?;
        let base_url = Url::parse(&base_url)?;

        if !contract.is_interface() {
            return Err(Error::contract(format!(
                "target `{}` is not an interface; describe a trait object (`dyn Api`)",
                contract.target()
            )));
        }

        for descriptor in self.method_fns.keys() {
            if contract.method(descriptor).is_none() {
                return Err(Error::contract(format!(
                    "target `{}` declares no method `{descriptor}`",
                    contract.target()
                )));
            }
        }

        let mut methods = HashMap::with_capacity(contract.len());
        for method in contract.methods() {
            let descriptor = method.descriptor();
            let merged = InvocationFns::merge(
                self.common_fns.as_ref(),
                self.method_fns.get(&descriptor),
            );
            let fns = merged.resolve(method)?;
            methods.insert(
                descriptor,
                ProxyMethod {
                    contract: Arc::clone(method),
                    fns,
                },
            );
        }

        Ok(Proxy {
            target: contract.target(),
            client,
            base_url,
            methods: Arc::new(methods),
        })
    }
}

// ============================================================================
// Proxy
// ============================================================================

#[derive(Clone)]
struct ProxyMethod {
    contract: Arc<MethodContract>,
    fns: ResolvedInvocationFns,
}

/// A built proxy: the dispatcher behind a decorated interface.
///
/// The proxy itself is stateless per call; the registry of resolved bundles
/// is read-only and shared, so one instance serves concurrent callers
/// without locking.
pub struct Proxy<C> {
    target: &'static str,
    client: C,
    base_url: Url,
    methods: Arc<HashMap<MethodDescriptor, ProxyMethod>>,
}

impl<C: Clone> Clone for Proxy<C> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            methods: Arc::clone(&self.methods),
        }
    }
}

impl<C> std::fmt::Debug for Proxy<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy")
            .field("target", &self.target)
            .field("base_url", &self.base_url.as_str())
            .field("methods", &self.methods.len())
            .finish_non_exhaustive()
    }
}

impl<C> Proxy<C> {
    /// The decorated target type name.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        self.target
    }

    /// The base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Number of registered method descriptors.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Iterate over the registered descriptors.
    pub fn descriptors(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.keys()
    }

    /// Look up a registered descriptor by method name.
    ///
    /// Method names are unique within a Rust trait, so the name alone
    /// identifies the descriptor.
    #[must_use]
    pub fn descriptor_named(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.keys().find(|d| d.name() == name)
    }

    fn prepare(
        &self,
        descriptor: &MethodDescriptor,
        args: Vec<ArgValue>,
    ) -> Result<(InvocationParameters, &ProxyMethod)> {
        let method = self.methods.get(descriptor).ok_or_else(|| {
            Error::contract(format!(
                "target `{}` declares no method `{descriptor}`",
                self.target
            ))
        })?;
        let parameters =
            InvocationParameters::new(self.target, Arc::clone(&method.contract), args)?;
        Ok((parameters, method))
    }

    fn build_request(
        parameters: &InvocationParameters,
        fns: &ResolvedInvocationFns,
        base_url: &Url,
    ) -> Result<Request<Bytes>> {
        let url = fns.uri.build(parameters, base_url)?;

        let mut headers = HashMap::new();
        fns.headers.build(parameters, &mut headers)?;
        let mut cookies = HashMap::new();
        fns.cookies.build(parameters, &mut cookies)?;

        let verb = parameters.method().verb();
        let mut builder = Request::builder(verb, url)
            .headers(headers)
            .cookies(cookies);

        if verb.has_request_body()
            && let Some(inserter) = &fns.body
            && let Some(body) = inserter.insert(parameters)?
        {
            builder = builder.body(body);
        }

        Ok(builder.build())
    }
}

impl<C: HttpClient> Proxy<C> {
    async fn exchange(
        &self,
        parameters: &InvocationParameters,
        fns: &ResolvedInvocationFns,
    ) -> Result<Response> {
        let request = Self::build_request(parameters, fns, &self.base_url)?;
        debug!(
            interface = self.target,
            method = %parameters.method().descriptor(),
            url = %request.url(),
            "dispatching"
        );

        let response = self.client.execute(request).await?;

        if fns.error_detector.is_error(response.status()) {
            let (status, headers, response_body) = response.into_parts();
            return Err(fns.error_decoder.decode(status, &headers, &response_body));
        }
        fns.response.build(parameters, response)
    }

    /// Invoke a method returning a single JSON-decoded value.
    ///
    /// # Errors
    ///
    /// Configuration errors for unknown descriptors, wrong arity, or a
    /// `Many` return kind; transport errors from the client; a decoded
    /// domain error when the error detector matches; deserialization
    /// errors for non-conforming payloads.
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        descriptor: &MethodDescriptor,
        args: Vec<ArgValue>,
    ) -> Result<T> {
        let (parameters, method) = self.prepare(descriptor, args)?;
        if method.contract.return_kind() == ReturnKind::Many {
            return Err(Error::contract(format!(
                "method `{descriptor}` declares a streaming result; use `invoke_stream`"
            )));
        }
        let response = self.exchange(&parameters, &method.fns).await?;
        courier_core::from_json(response.body())
    }

    /// Invoke a method and discard the payload.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Proxy::invoke`], minus deserialization.
    pub async fn invoke_unit(
        &self,
        descriptor: &MethodDescriptor,
        args: Vec<ArgValue>,
    ) -> Result<()> {
        let (parameters, method) = self.prepare(descriptor, args)?;
        if method.contract.return_kind() == ReturnKind::Many {
            return Err(Error::contract(format!(
                "method `{descriptor}` declares a streaming result; use `invoke_stream`"
            )));
        }
        self.exchange(&parameters, &method.fns).await?;
        Ok(())
    }

    /// Invoke a method returning the raw transformed response.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Proxy::invoke`], minus deserialization.
    pub async fn invoke_raw(
        &self,
        descriptor: &MethodDescriptor,
        args: Vec<ArgValue>,
    ) -> Result<Response> {
        let (parameters, method) = self.prepare(descriptor, args)?;
        self.exchange(&parameters, &method.fns).await
    }
}

impl<C: HttpClientStreaming> Proxy<C> {
    /// Invoke a method returning a lazy stream of JSON-decoded records.
    ///
    /// The response body is consumed as newline-delimited JSON; each line
    /// decodes into one `T`. A detector-matched status buffers the body and
    /// decodes it into a domain error before any record is yielded.
    ///
    /// # Errors
    ///
    /// Configuration errors for unknown descriptors, wrong arity, or a
    /// non-`Many` return kind; transport errors; a decoded domain error
    /// when the error detector matches.
    pub async fn invoke_stream<T>(
        &self,
        descriptor: &MethodDescriptor,
        args: Vec<ArgValue>,
    ) -> Result<BoxStream<'static, Result<T>>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (parameters, method) = self.prepare(descriptor, args)?;
        if method.contract.return_kind() != ReturnKind::Many {
            return Err(Error::contract(format!(
                "method `{descriptor}` declares a single result; use `invoke`"
            )));
        }

        let request = Self::build_request(&parameters, &method.fns, &self.base_url)?;
        debug!(
            interface = self.target,
            method = %descriptor,
            url = %request.url(),
            "dispatching stream"
        );

        let response = self.client.execute_streaming(request).await?;

        if method.fns.error_detector.is_error(response.status()) {
            let buffered = response.collect().await?;
            let (status, headers, response_body) = buffered.into_parts();
            return Err(method
                .fns
                .error_decoder
                .decode(status, &headers, &response_body));
        }

        let records = courier_core::lines(response.into_body())
            .map(|record| record.and_then(|bytes| courier_core::from_json(&bytes)));
        Ok(records.boxed())
    }
}
