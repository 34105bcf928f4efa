//! HTTP response handling.
//!
//! [`Response`] provides access to status, headers, and a buffered body with
//! JSON/text deserialization. [`streaming::StreamingResponse`] carries a
//! chunked body for lazy multi-value results; [`streaming::lines`] splits it
//! into newline-delimited records.

use std::collections::HashMap;

use bytes::Bytes;

// ============================================================================
// Streaming Response
// ============================================================================

/// Streaming response support.
pub mod streaming {
    use std::collections::HashMap;
    use std::pin::Pin;

    use bytes::{Bytes, BytesMut};
    use futures_core::Stream;
    use futures_util::StreamExt;

    /// A streaming body: chunks of bytes arriving over time.
    pub type StreamingBody = Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send>>;

    /// HTTP response with streaming body, for lazy multi-value payloads.
    ///
    /// Unlike [`super::Response`], the body is consumed as a stream of chunks.
    pub struct StreamingResponse {
        status: u16,
        headers: HashMap<String, String>,
        body: StreamingBody,
    }

    impl StreamingResponse {
        /// Creates a new streaming response.
        #[must_use]
        pub fn new(status: u16, headers: HashMap<String, String>, body: StreamingBody) -> Self {
            Self {
                status,
                headers,
                body,
            }
        }

        /// HTTP status code.
        #[must_use]
        pub const fn status(&self) -> u16 {
            self.status
        }

        /// Response headers.
        #[must_use]
        pub fn headers(&self) -> &HashMap<String, String> {
            &self.headers
        }

        /// Single header value by name.
        #[must_use]
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).map(String::as_str)
        }

        /// Status is 2xx.
        #[must_use]
        pub const fn is_success(&self) -> bool {
            self.status >= 200 && self.status < 300
        }

        /// Consume into the streaming body.
        #[must_use]
        pub fn into_body(self) -> StreamingBody {
            self.body
        }

        /// Buffer the entire stream into a [`Response`].
        ///
        /// # Errors
        ///
        /// Returns an error if reading any chunk fails.
        pub async fn collect(self) -> crate::Result<super::Response<Bytes>> {
            let mut body = self.body;
            let mut collected = Vec::new();

            while let Some(chunk) = body.next().await {
                collected.extend_from_slice(&chunk?);
            }

            Ok(super::Response::new(
                self.status,
                self.headers,
                Bytes::from(collected),
            ))
        }
    }

    /// Split a streaming body into newline-delimited records.
    ///
    /// Empty lines are skipped, a trailing `\r` is stripped from each line,
    /// and a final record without a newline terminator is still yielded.
    /// Chunk boundaries need not align with line boundaries.
    pub fn lines(body: StreamingBody) -> impl Stream<Item = crate::Result<Bytes>> + Send {
        struct State {
            body: StreamingBody,
            buffer: BytesMut,
            done: bool,
        }

        let state = State {
            body,
            buffer: BytesMut::new(),
            done: false,
        };

        futures_util::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(pos) = state.buffer.iter().position(|b| *b == b'\n') {
                    let mut line = state.buffer.split_to(pos + 1);
                    line.truncate(pos);
                    if line.last() == Some(&b'\r') {
                        line.truncate(line.len() - 1);
                    }
                    if line.is_empty() {
                        continue;
                    }
                    return Some((Ok(line.freeze()), state));
                }

                if state.done {
                    if state.buffer.is_empty() {
                        return None;
                    }
                    let rest = state.buffer.split().freeze();
                    return Some((Ok(rest), state));
                }

                match state.body.next().await {
                    Some(Ok(chunk)) => state.buffer.extend_from_slice(&chunk),
                    Some(Err(err)) => {
                        state.done = true;
                        return Some((Err(err), state));
                    }
                    None => state.done = true,
                }
            }
        })
    }
}

// ============================================================================
// Buffered Response
// ============================================================================

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 3xx.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.status >= 300 && self.status < 400
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Transform the body with a function.
    pub fn map_body<F, B2>(self, f: F) -> Response<B2>
    where
        F: FnOnce(B) -> B2,
    {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl Response<Bytes> {
    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::streaming::{StreamingBody, lines};
    use super::*;

    #[test]
    fn response_basic() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = Response::new(200, headers, Bytes::from(r#"{"id":1}"#));

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
    }

    #[test]
    fn response_status_checks() {
        let response = Response::new(301, HashMap::new(), Bytes::new());
        assert!(response.is_redirection());

        let response = Response::new(404, HashMap::new(), Bytes::new());
        assert!(response.is_client_error());

        let response = Response::new(500, HashMap::new(), Bytes::new());
        assert!(response.is_server_error());
    }

    #[test]
    fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            id: u64,
        }

        let response = Response::new(200, HashMap::new(), Bytes::from(r#"{"id":1}"#));
        let user: User = response.json().expect("deserialize");
        assert_eq!(user, User { id: 1 });
    }

    #[test]
    fn response_text() {
        let response = Response::new(200, HashMap::new(), Bytes::from("Hello, World!"));
        assert_eq!(response.text().expect("text"), "Hello, World!");
    }

    fn body_of(chunks: Vec<&'static [u8]>) -> StreamingBody {
        Box::pin(futures_util::stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok(Bytes::from_static(c)))
                .collect::<Vec<_>>(),
        ))
    }

    #[tokio::test]
    async fn lines_splits_records() {
        let body = body_of(vec![b"{\"a\":1}\n{\"b\"", b":2}\n{\"c\":3}"]);
        let records: Vec<_> = lines(body).collect().await;

        let records: Vec<_> = records
            .into_iter()
            .map(|r| r.expect("record"))
            .collect();
        assert_eq!(
            records,
            vec![
                Bytes::from_static(b"{\"a\":1}"),
                Bytes::from_static(b"{\"b\":2}"),
                Bytes::from_static(b"{\"c\":3}"),
            ]
        );
    }

    #[tokio::test]
    async fn lines_skips_blank_lines_and_strips_cr() {
        let body = body_of(vec![b"one\r\n\r\ntwo\r\n"]);
        let records: Vec<_> = lines(body).collect().await;

        let records: Vec<_> = records
            .into_iter()
            .map(|r| r.expect("record"))
            .collect();
        assert_eq!(
            records,
            vec![Bytes::from_static(b"one"), Bytes::from_static(b"two")]
        );
    }

    #[tokio::test]
    async fn lines_empty_body() {
        let body = body_of(vec![]);
        let records: Vec<_> = lines(body).collect().await;
        assert!(records.is_empty());
    }
}
