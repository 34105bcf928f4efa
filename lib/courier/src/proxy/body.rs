//! Request body insertion.

use bytes::Bytes;
use courier_core::{ContentType, Error, Result, to_form, to_json};

use super::invocation::{ArgValue, InvocationParameters};

/// Produces the request body for one invocation.
///
/// The dispatcher only runs the inserter for verbs that carry a request
/// body; for bodyless verbs this step never executes.
pub trait BodyInserter: Send + Sync {
    /// Serialize the body-bound argument, if any.
    fn insert(&self, parameters: &InvocationParameters) -> Result<Option<Bytes>>;
}

/// Default body inserter.
///
/// Serializes the body-bound argument according to the declared consumed
/// content type: JSON unless the method consumes
/// `application/x-www-form-urlencoded`. Raw byte payloads and scalar text
/// pass through unchanged; an absent optional body yields no body at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializingBodyInserter;

impl BodyInserter for SerializingBodyInserter {
    fn insert(&self, parameters: &InvocationParameters) -> Result<Option<Bytes>> {
        let Some((param, value)) = parameters.body() else {
            return Ok(None);
        };

        match value {
            ArgValue::None => Ok(None),
            ArgValue::Bytes(bytes) => Ok(Some(bytes.clone())),
            ArgValue::Scalar(text) => Ok(Some(Bytes::copy_from_slice(text.as_bytes()))),
            ArgValue::Json(value) => {
                let bytes = match parameters.method().consumed() {
                    Some(ContentType::FormUrlEncoded) => to_form(value)?,
                    _ => to_json(value)?,
                };
                Ok(Some(bytes))
            }
            ArgValue::Repeated(_) => Err(Error::invalid_request(format!(
                "body parameter `{}` must not be a repeated value",
                param.name()
            ))),
        }
    }
}
