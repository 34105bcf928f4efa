//! Response transformation.

use courier_core::{Response, Result};

use super::invocation::InvocationParameters;

/// Transforms a successful response before typed decoding.
///
/// The transformer runs after the error detector has accepted the response
/// and before the dispatcher shapes the result into the declared return
/// kind. Override it to unwrap envelopes or post-process payloads; it is
/// not applied to streaming results, whose records are decoded lazily.
pub trait ResponseBuilder: Send + Sync {
    /// Transform the accepted response.
    fn build(&self, parameters: &InvocationParameters, response: Response) -> Result<Response>;
}

/// Default response builder: the response payload is returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadResponseBuilder;

impl ResponseBuilder for PayloadResponseBuilder {
    fn build(&self, _parameters: &InvocationParameters, response: Response) -> Result<Response> {
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use bytes::Bytes;

    use super::super::contract::MethodContract;
    use super::*;

    #[test]
    fn payload_builder_is_identity() {
        let parameters = InvocationParameters::new(
            "dyn Api",
            Arc::new(MethodContract::get("list", "/items")),
            vec![],
        )
        .expect("parameters");
        let response = Response::new(200, HashMap::new(), Bytes::from_static(b"[1,2]"));

        let built = PayloadResponseBuilder
            .build(&parameters, response)
            .expect("response");
        assert_eq!(built.status(), 200);
        assert_eq!(built.body().as_ref(), b"[1,2]");
    }
}
