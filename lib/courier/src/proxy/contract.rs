//! Interface contracts.
//!
//! A [`Contract`] is the explicit description of a decorated interface: one
//! [`MethodContract`] per declared method, each carrying the HTTP metadata
//! (verb, path template, content types, parameter bindings, return kind)
//! that annotations carry in annotation-driven clients.
//!
//! Contracts are plain values built with [`Contract::builder`]; resolving
//! one performs no I/O.
//!
//! # Example
//!
//! ```
//! use courier::proxy::{Contract, MethodContract, Param};
//!
//! trait UserApi {}
//!
//! let contract = Contract::builder::<dyn UserApi>()
//!     .base_path("/api")
//!     .method(
//!         MethodContract::get("get_user", "/users/{id}")
//!             .param(Param::path("id", "u64")),
//!     )
//!     .build()
//!     .unwrap();
//! assert_eq!(contract.len(), 1);
//! ```

use std::sync::Arc;

use courier_core::{ContentType, Error, Method, Result};

use super::descriptor::MethodDescriptor;

// ============================================================================
// Parameter Bindings
// ============================================================================

/// Where a method parameter is sent in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Path template placeholder (e.g., `/users/{id}`).
    Path,
    /// Query parameter.
    Query,
    /// Request header.
    Header,
    /// Request cookie.
    Cookie,
    /// Request body.
    Body,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Cookie => write!(f, "cookie"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// A declared method parameter: name, type name, and binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    ty: String,
    binding: Binding,
}

impl Param {
    fn new(name: impl Into<String>, ty: impl Into<String>, binding: Binding) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            binding,
        }
    }

    /// A path-bound parameter, substituted into the path template.
    #[must_use]
    pub fn path(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, ty, Binding::Path)
    }

    /// A query-bound parameter.
    #[must_use]
    pub fn query(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, ty, Binding::Query)
    }

    /// A header-bound parameter.
    #[must_use]
    pub fn header(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, ty, Binding::Header)
    }

    /// A cookie-bound parameter.
    #[must_use]
    pub fn cookie(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, ty, Binding::Cookie)
    }

    /// The body-bound parameter (at most one per method).
    #[must_use]
    pub fn body(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, ty, Binding::Body)
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter type name.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Parameter binding.
    #[must_use]
    pub const fn binding(&self) -> Binding {
        self.binding
    }
}

// ============================================================================
// Return Kind
// ============================================================================

/// The declared shape of a method result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnKind {
    /// No payload; only success or failure.
    Unit,
    /// One deferred value.
    #[default]
    Single,
    /// A lazy sequence of values (newline-delimited records).
    Many,
}

// ============================================================================
// Method Contract
// ============================================================================

/// Per-method HTTP metadata.
#[derive(Debug, Clone)]
pub struct MethodContract {
    name: String,
    method: Method,
    path: String,
    produces: Option<ContentType>,
    consumes: Option<ContentType>,
    params: Vec<Param>,
    returns: ReturnKind,
}

impl MethodContract {
    /// Creates a method contract for the given verb and path template.
    #[must_use]
    pub fn new(method: Method, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            produces: None,
            consumes: None,
            params: Vec::new(),
            returns: ReturnKind::default(),
        }
    }

    /// A GET method contract.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Get, name, path)
    }

    /// A POST method contract.
    #[must_use]
    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Post, name, path)
    }

    /// A PUT method contract.
    #[must_use]
    pub fn put(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Put, name, path)
    }

    /// A DELETE method contract.
    #[must_use]
    pub fn delete(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Delete, name, path)
    }

    /// A PATCH method contract.
    #[must_use]
    pub fn patch(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Patch, name, path)
    }

    /// A HEAD method contract.
    #[must_use]
    pub fn head(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Head, name, path)
    }

    /// An OPTIONS method contract.
    #[must_use]
    pub fn options(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Options, name, path)
    }

    /// Declares a parameter; declaration order is the call-site argument
    /// order and part of the method identity.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Declares the produced (accepted) response content type.
    #[must_use]
    pub const fn produces(mut self, content_type: ContentType) -> Self {
        self.produces = Some(content_type);
        self
    }

    /// Declares the consumed (request body) content type.
    #[must_use]
    pub const fn consumes(mut self, content_type: ContentType) -> Self {
        self.consumes = Some(content_type);
        self
    }

    /// Declares the return kind.
    #[must_use]
    pub const fn returns(mut self, returns: ReturnKind) -> Self {
        self.returns = returns;
        self
    }

    /// The identity key of this method.
    #[must_use]
    pub fn descriptor(&self) -> MethodDescriptor {
        MethodDescriptor::new(self.name.clone(), self.params.iter().map(Param::ty))
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTP verb.
    #[must_use]
    pub const fn verb(&self) -> Method {
        self.method
    }

    /// Path template, including the contract base path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared response content type.
    #[must_use]
    pub const fn produced(&self) -> Option<ContentType> {
        self.produces
    }

    /// Declared request body content type.
    #[must_use]
    pub const fn consumed(&self) -> Option<ContentType> {
        self.consumes
    }

    /// Declared parameters, in order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Declared return kind.
    #[must_use]
    pub const fn return_kind(&self) -> ReturnKind {
        self.returns
    }

    fn validate(&self) -> Result<()> {
        let descriptor = self.descriptor();

        let bodies = self
            .params
            .iter()
            .filter(|p| p.binding() == Binding::Body)
            .count();
        if bodies > 1 {
            return Err(Error::contract(format!(
                "method `{descriptor}`: more than one body parameter"
            )));
        }
        if bodies > 0 && !self.method.has_request_body() {
            return Err(Error::contract(format!(
                "method `{descriptor}`: body parameter on bodyless verb {}",
                self.method
            )));
        }

        let placeholders = placeholders(&self.path).map_err(|message| {
            Error::contract(format!("method `{descriptor}`: {message}"))
        })?;
        for placeholder in &placeholders {
            if !self
                .params
                .iter()
                .any(|p| p.binding() == Binding::Path && p.name() == placeholder)
            {
                return Err(Error::contract(format!(
                    "method `{descriptor}`: no path parameter for placeholder `{{{placeholder}}}`"
                )));
            }
        }
        for param in self.params.iter().filter(|p| p.binding() == Binding::Path) {
            if !placeholders.iter().any(|p| p == param.name()) {
                return Err(Error::contract(format!(
                    "method `{descriptor}`: path parameter `{}` has no placeholder in `{}`",
                    param.name(),
                    self.path
                )));
            }
        }
        Ok(())
    }
}

/// Extract `{name}` placeholders from a path template.
fn placeholders(path: &str) -> std::result::Result<Vec<String>, String> {
    let mut found = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(after) = rest.get(start + 1..) else {
            return Err(format!("unclosed placeholder in `{path}`"));
        };
        let Some(end) = after.find('}') else {
            return Err(format!("unclosed placeholder in `{path}`"));
        };
        let Some(name) = after.get(..end) else {
            return Err(format!("unclosed placeholder in `{path}`"));
        };
        if name.is_empty() {
            return Err(format!("empty placeholder in `{path}`"));
        }
        found.push(name.to_string());
        rest = after.get(end + 1..).unwrap_or("");
    }
    Ok(found)
}

// ============================================================================
// Contract
// ============================================================================

/// The description of a decorated interface.
#[derive(Debug, Clone)]
pub struct Contract {
    target: &'static str,
    methods: Vec<Arc<MethodContract>>,
}

impl Contract {
    /// Creates a builder for the interface type `T`.
    ///
    /// `T` is the trait object of the decorated interface (e.g.,
    /// `dyn UserApi`). Concrete types are rejected at proxy-build time.
    #[must_use]
    pub fn builder<T: ?Sized + 'static>() -> ContractBuilder {
        ContractBuilder {
            target: std::any::type_name::<T>(),
            base_path: String::new(),
            methods: Vec::new(),
        }
    }

    /// The decorated target type name.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        self.target
    }

    /// Whether the target type is an interface (trait object).
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.target.starts_with("dyn ")
    }

    /// Declared methods.
    #[must_use]
    pub fn methods(&self) -> &[Arc<MethodContract>] {
        &self.methods
    }

    /// Number of declared methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the contract declares no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Look up a method by descriptor.
    #[must_use]
    pub fn method(&self, descriptor: &MethodDescriptor) -> Option<&Arc<MethodContract>> {
        self.methods
            .iter()
            .find(|m| &m.descriptor() == descriptor)
    }
}

/// Builder for [`Contract`].
#[derive(Debug)]
pub struct ContractBuilder {
    target: &'static str,
    base_path: String,
    methods: Vec<MethodContract>,
}

impl ContractBuilder {
    /// Sets a base path prepended to every method path template.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Declares a method.
    #[must_use]
    pub fn method(mut self, method: MethodContract) -> Self {
        self.methods.push(method);
        self
    }

    /// Builds the contract.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for duplicate descriptors, multiple or
    /// misplaced body parameters, or path templates whose placeholders do
    /// not line up with the declared path parameters.
    pub fn build(self) -> Result<Contract> {
        let mut methods = Vec::with_capacity(self.methods.len());
        let mut seen = std::collections::HashSet::new();

        for mut method in self.methods {
            if !self.base_path.is_empty() {
                method.path = join_paths(&self.base_path, &method.path);
            }
            method.validate()?;
            let descriptor = method.descriptor();
            if !seen.insert(descriptor.clone()) {
                return Err(Error::contract(format!(
                    "target `{}`: duplicate method `{descriptor}`",
                    self.target
                )));
            }
            methods.push(Arc::new(method));
        }

        Ok(Contract {
            target: self.target,
            methods,
        })
    }
}

fn join_paths(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
