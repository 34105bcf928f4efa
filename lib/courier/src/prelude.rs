//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    ArgValue, ClientConfig, ContentType, Contract, Error, HttpClient, HttpClientStreaming,
    HyperClient, InvocationFns, Method, MethodContract, MethodDescriptor, Param, Proxy,
    ProxyBuilder, Request, Response, RestError, Result, ReturnKind,
};
pub use serde::{Deserialize, Serialize};
