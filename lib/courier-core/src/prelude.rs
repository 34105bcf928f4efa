//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Error, ErrorDecoder, HttpClient, HttpClientStreaming, Method, Request,
    RequestBuilder, Response, RestError, Result, from_json, to_form, to_json, to_query_string,
};
