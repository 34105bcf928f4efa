//! Invocation function bundles.
//!
//! An [`InvocationFns`] bundle names every behavior needed to turn one
//! interface method call into one HTTP exchange: URI builder, headers
//! builder, cookies builder, body inserter, error detector, error decoder,
//! and response builder.
//!
//! Bundles are layered: a common bundle applies to every method, per-method
//! bundles override it field by field. The layering is resolved once at
//! proxy-build time; a mandatory field that neither layer sets is a
//! configuration error, never a silent no-op.

use std::sync::Arc;

use courier_core::{Error, ErrorDecoder, Result};

use super::body::{BodyInserter, SerializingBodyInserter};
use super::contract::MethodContract;
use super::cookies::{ContractCookiesBuilder, CookiesBuilder};
use super::decoder::RestErrorDecoder;
use super::detector::{DefaultErrorDetector, ErrorDetector};
use super::headers::{ContractHeadersBuilder, HeadersBuilder};
use super::response::{PayloadResponseBuilder, ResponseBuilder};
use super::uri::{TemplateUriBuilder, UriBuilder};

/// A bundle of invocation behaviors; every field is optional until the
/// layers are resolved.
#[derive(Clone, Default)]
pub struct InvocationFns {
    pub(crate) uri: Option<Arc<dyn UriBuilder>>,
    pub(crate) headers: Option<Arc<dyn HeadersBuilder>>,
    pub(crate) cookies: Option<Arc<dyn CookiesBuilder>>,
    pub(crate) body: Option<Arc<dyn BodyInserter>>,
    pub(crate) error_detector: Option<Arc<dyn ErrorDetector>>,
    pub(crate) error_decoder: Option<Arc<dyn ErrorDecoder>>,
    pub(crate) response: Option<Arc<dyn ResponseBuilder>>,
}

impl std::fmt::Debug for InvocationFns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationFns")
            .field("uri", &self.uri.is_some())
            .field("headers", &self.headers.is_some())
            .field("cookies", &self.cookies.is_some())
            .field("body", &self.body.is_some())
            .field("error_detector", &self.error_detector.is_some())
            .field("error_decoder", &self.error_decoder.is_some())
            .field("response", &self.response.is_some())
            .finish()
    }
}

impl InvocationFns {
    /// Creates an empty bundle builder.
    #[must_use]
    pub fn builder() -> InvocationFnsBuilder {
        InvocationFnsBuilder::default()
    }

    /// A bundle with every field set to its stock behavior.
    ///
    /// This is the usual common bundle: template URI building, contract
    /// headers and cookies, serializing body insertion, 4xx/5xx error
    /// detection, JSON error-model decoding, and pass-through responses.
    #[must_use]
    pub fn standard() -> Self {
        Self::builder()
            .uri(TemplateUriBuilder)
            .headers(ContractHeadersBuilder)
            .cookies(ContractCookiesBuilder)
            .body(SerializingBodyInserter)
            .error_detector(DefaultErrorDetector)
            .error_decoder(RestErrorDecoder)
            .response(PayloadResponseBuilder)
            .build()
    }

    /// Overlays `method` over `common`, field by field.
    pub(crate) fn merge(common: Option<&Self>, method: Option<&Self>) -> Self {
        let mut merged = Self::default();
        if let Some(layer) = common {
            merged.overlay(layer);
        }
        if let Some(layer) = method {
            merged.overlay(layer);
        }
        merged
    }

    fn overlay(&mut self, layer: &Self) {
        if layer.uri.is_some() {
            self.uri = layer.uri.clone();
        }
        if layer.headers.is_some() {
            self.headers = layer.headers.clone();
        }
        if layer.cookies.is_some() {
            self.cookies = layer.cookies.clone();
        }
        if layer.body.is_some() {
            self.body = layer.body.clone();
        }
        if layer.error_detector.is_some() {
            self.error_detector = layer.error_detector.clone();
        }
        if layer.error_decoder.is_some() {
            self.error_decoder = layer.error_decoder.clone();
        }
        if layer.response.is_some() {
            self.response = layer.response.clone();
        }
    }

    /// Resolves the merged bundle for one method, failing fast on any
    /// missing mandatory field.
    pub(crate) fn resolve(&self, method: &MethodContract) -> Result<ResolvedInvocationFns> {
        let descriptor = method.descriptor();

        let body = if method.verb().has_request_body() {
            Some(require(&self.body, &descriptor.to_string(), "body inserter")?)
        } else {
            // Kept unset so the insertion step cannot run for bodyless verbs.
            None
        };

        Ok(ResolvedInvocationFns {
            uri: require(&self.uri, &descriptor.to_string(), "uri builder")?,
            headers: require(&self.headers, &descriptor.to_string(), "headers builder")?,
            cookies: require(&self.cookies, &descriptor.to_string(), "cookies builder")?,
            body,
            error_detector: require(
                &self.error_detector,
                &descriptor.to_string(),
                "error detector",
            )?,
            error_decoder: require(
                &self.error_decoder,
                &descriptor.to_string(),
                "error decoder",
            )?,
            response: require(&self.response, &descriptor.to_string(), "response builder")?,
        })
    }
}

fn require<T: ?Sized>(field: &Option<Arc<T>>, descriptor: &str, what: &str) -> Result<Arc<T>> {
    field
        .clone()
        .ok_or_else(|| Error::contract(format!("method `{descriptor}`: no {what} configured")))
}

/// A fully-resolved bundle; read-only after proxy build.
#[derive(Clone)]
pub(crate) struct ResolvedInvocationFns {
    pub(crate) uri: Arc<dyn UriBuilder>,
    pub(crate) headers: Arc<dyn HeadersBuilder>,
    pub(crate) cookies: Arc<dyn CookiesBuilder>,
    pub(crate) body: Option<Arc<dyn BodyInserter>>,
    pub(crate) error_detector: Arc<dyn ErrorDetector>,
    pub(crate) error_decoder: Arc<dyn ErrorDecoder>,
    pub(crate) response: Arc<dyn ResponseBuilder>,
}

impl std::fmt::Debug for ResolvedInvocationFns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedInvocationFns")
            .field("has_body", &self.body.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`InvocationFns`].
#[derive(Default)]
pub struct InvocationFnsBuilder {
    fns: InvocationFns,
}

impl InvocationFnsBuilder {
    /// Sets the URI builder.
    #[must_use]
    pub fn uri(mut self, uri: impl UriBuilder + 'static) -> Self {
        self.fns.uri = Some(Arc::new(uri));
        self
    }

    /// Sets the headers builder.
    #[must_use]
    pub fn headers(mut self, headers: impl HeadersBuilder + 'static) -> Self {
        self.fns.headers = Some(Arc::new(headers));
        self
    }

    /// Sets the cookies builder.
    #[must_use]
    pub fn cookies(mut self, cookies: impl CookiesBuilder + 'static) -> Self {
        self.fns.cookies = Some(Arc::new(cookies));
        self
    }

    /// Sets the body inserter.
    #[must_use]
    pub fn body(mut self, body: impl BodyInserter + 'static) -> Self {
        self.fns.body = Some(Arc::new(body));
        self
    }

    /// Sets the error detector.
    #[must_use]
    pub fn error_detector(mut self, detector: impl ErrorDetector + 'static) -> Self {
        self.fns.error_detector = Some(Arc::new(detector));
        self
    }

    /// Sets the error decoder.
    #[must_use]
    pub fn error_decoder(mut self, decoder: impl ErrorDecoder + 'static) -> Self {
        self.fns.error_decoder = Some(Arc::new(decoder));
        self
    }

    /// Sets the response builder.
    #[must_use]
    pub fn response(mut self, response: impl ResponseBuilder + 'static) -> Self {
        self.fns.response = Some(Arc::new(response));
        self
    }

    /// Builds the bundle.
    #[must_use]
    pub fn build(self) -> InvocationFns {
        self.fns
    }
}

#[cfg(test)]
mod tests {
    use super::super::contract::{MethodContract, Param};
    use super::*;

    #[test]
    fn merge_prefers_method_fields_over_common() {
        let common = InvocationFns::standard();
        let method = InvocationFns::builder()
            .error_detector(|status: u16| status >= 500)
            .build();

        let merged = InvocationFns::merge(Some(&common), Some(&method));

        // Method layer wins for the field it sets.
        let method_detector = method.error_detector.as_ref().expect("method detector");
        let merged_detector = merged.error_detector.as_ref().expect("merged detector");
        assert!(Arc::ptr_eq(method_detector, merged_detector));

        // Common layer fills every other field, independently.
        let common_uri = common.uri.as_ref().expect("common uri");
        let merged_uri = merged.uri.as_ref().expect("merged uri");
        assert!(Arc::ptr_eq(common_uri, merged_uri));

        let common_decoder = common.error_decoder.as_ref().expect("common decoder");
        let merged_decoder = merged.error_decoder.as_ref().expect("merged decoder");
        assert!(Arc::ptr_eq(common_decoder, merged_decoder));
    }

    #[test]
    fn merge_without_common_keeps_method_fields_only() {
        let method = InvocationFns::builder().uri(TemplateUriBuilder).build();
        let merged = InvocationFns::merge(None, Some(&method));

        assert!(merged.uri.is_some());
        assert!(merged.headers.is_none());
        assert!(merged.error_decoder.is_none());
    }

    #[test]
    fn resolve_fails_fast_on_missing_field() {
        let fns = InvocationFns::builder().uri(TemplateUriBuilder).build();
        let method = MethodContract::get("list", "/items");

        let err = fns.resolve(&method).expect_err("incomplete bundle");
        assert!(err.is_contract());
        assert!(
            err.to_string()
                .contains("method `list()`: no headers builder configured")
        );
    }

    #[test]
    fn resolve_requires_body_inserter_for_body_verbs() {
        let mut fns = InvocationFns::standard();
        fns.body = None;

        let bodyless = MethodContract::get("list", "/items");
        assert!(fns.resolve(&bodyless).is_ok());

        let with_body =
            MethodContract::post("create", "/items").param(Param::body("item", "Item"));
        let err = fns.resolve(&with_body).expect_err("missing body inserter");
        assert!(
            err.to_string()
                .contains("no body inserter configured")
        );
    }

    #[test]
    fn resolve_drops_body_inserter_for_bodyless_verbs() {
        let fns = InvocationFns::standard();
        let bodyless = MethodContract::delete("remove", "/items/{id}")
            .param(Param::path("id", "u64"));

        let resolved = fns.resolve(&bodyless).expect("resolve");
        assert!(resolved.body.is_none());
    }

    #[test]
    fn standard_bundle_is_complete() {
        let fns = InvocationFns::standard();
        let method = MethodContract::post("create", "/items").param(Param::body("item", "Item"));
        assert!(fns.resolve(&method).is_ok());
    }
}
