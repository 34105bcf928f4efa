//! Error decoders.
//!
//! Decoders turn a rejected response (status, headers, buffered body) into
//! [`Error::Rejected`] carrying a parsed [`RestError`] model.

use std::collections::HashMap;

use bytes::Bytes;
use courier_core::{Error, ErrorDecoder, RestError};
use tracing::debug;

/// Decoder for services that report failures as a JSON [`RestError`] body.
///
/// Bodies that do not parse as the error model fall back to a message-only
/// model built from the body text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestErrorDecoder;

impl ErrorDecoder for RestErrorDecoder {
    fn decode(
        &self,
        status: u16,
        headers: &HashMap<String, String>,
        body: &Bytes,
    ) -> Error {
        let parsed = serde_json::from_slice::<RestError>(body).ok();
        debug!(status, structured = parsed.is_some(), "decoding error response");

        let error = parsed.unwrap_or_else(|| {
            RestError::with_message(String::from_utf8_lossy(body).into_owned())
        });
        Error::rejected(status, headers.clone(), error)
    }
}

/// Decoder that treats the whole error body as a plain text message.
///
/// Useful against services that do not emit the structured error model. An
/// optional fixed error code is stamped onto every decoded error.
#[derive(Debug, Clone, Default)]
pub struct MessageAwareErrorDecoder {
    error_code: Option<String>,
}

impl MessageAwareErrorDecoder {
    /// Creates a decoder without an error code.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder stamping the given error code.
    #[must_use]
    pub fn with_error_code(error_code: impl Into<String>) -> Self {
        Self {
            error_code: Some(error_code.into()),
        }
    }
}

impl ErrorDecoder for MessageAwareErrorDecoder {
    fn decode(
        &self,
        status: u16,
        headers: &HashMap<String, String>,
        body: &Bytes,
    ) -> Error {
        let mut error = RestError::with_message(String::from_utf8_lossy(body).into_owned());
        error.error_code = self.error_code.clone();
        Error::rejected(status, headers.clone(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_decoder_parses_structured_body() {
        let body = Bytes::from_static(br#"{"message":"not found","errorCode":"E404"}"#);
        let err = RestErrorDecoder.decode(404, &HashMap::new(), &body);

        assert_eq!(err.status(), Some(404));
        let rest = err.rest_error().expect("rest error");
        assert_eq!(rest.message.as_deref(), Some("not found"));
        assert_eq!(rest.error_code.as_deref(), Some("E404"));
    }

    #[test]
    fn rest_decoder_falls_back_to_text() {
        let body = Bytes::from_static(b"service exploded");
        let err = RestErrorDecoder.decode(500, &HashMap::new(), &body);

        let rest = err.rest_error().expect("rest error");
        assert_eq!(rest.message.as_deref(), Some("service exploded"));
        assert!(rest.error_code.is_none());
    }

    #[test]
    fn message_decoder_uses_body_text() {
        let body = Bytes::from_static(b"quota exceeded");
        let err = MessageAwareErrorDecoder::with_error_code("QUOTA").decode(
            429,
            &HashMap::new(),
            &body,
        );

        assert_eq!(err.status(), Some(429));
        let rest = err.rest_error().expect("rest error");
        assert_eq!(rest.message.as_deref(), Some("quota exceeded"));
        assert_eq!(rest.error_code.as_deref(), Some("QUOTA"));
    }

    #[test]
    fn decoders_keep_response_headers() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), "req-9".to_string());
        let err = RestErrorDecoder.decode(502, &headers, &Bytes::new());

        let kept = err.response_headers().expect("headers");
        assert_eq!(kept.get("x-request-id").map(String::as_str), Some("req-9"));
    }
}
