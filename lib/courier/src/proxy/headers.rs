//! Request header building.

use std::collections::HashMap;

use courier_core::{Error, Result};

use super::contract::Binding;
use super::invocation::{ArgValue, InvocationParameters};

/// Builds the request headers for one invocation.
pub trait HeadersBuilder: Send + Sync {
    /// Populate the outgoing headers.
    fn build(
        &self,
        parameters: &InvocationParameters,
        headers: &mut HashMap<String, String>,
    ) -> Result<()>;
}

/// Default headers builder.
///
/// Sets `Accept` from the declared produced content type, `Content-Type`
/// from the declared consumed content type (body-carrying verbs only), then
/// the header-bound arguments. Repeated header values are joined with a
/// comma per HTTP conventions; absent optional values are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractHeadersBuilder;

impl HeadersBuilder for ContractHeadersBuilder {
    fn build(
        &self,
        parameters: &InvocationParameters,
        headers: &mut HashMap<String, String>,
    ) -> Result<()> {
        let method = parameters.method();

        if let Some(produces) = method.produced() {
            headers.insert("Accept".to_string(), produces.to_string());
        }
        if method.verb().has_request_body()
            && let Some(consumes) = method.consumed()
        {
            headers.insert("Content-Type".to_string(), consumes.to_string());
        }

        for (param, value) in parameters.bound(Binding::Header) {
            match value {
                ArgValue::None => {}
                ArgValue::Scalar(v) => {
                    headers.insert(param.name().to_string(), v.clone());
                }
                ArgValue::Repeated(values) => {
                    headers.insert(param.name().to_string(), values.join(", "));
                }
                other => {
                    return Err(Error::invalid_request(format!(
                        "header parameter `{}` must be a scalar or repeated value, got {}",
                        param.name(),
                        other.kind()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use courier_core::ContentType;

    use super::super::contract::{MethodContract, Param};
    use super::*;

    fn build(method: MethodContract, args: Vec<ArgValue>) -> Result<HashMap<String, String>> {
        let parameters =
            InvocationParameters::new("dyn Api", Arc::new(method), args).expect("parameters");
        let mut headers = HashMap::new();
        ContractHeadersBuilder.build(&parameters, &mut headers)?;
        Ok(headers)
    }

    #[test]
    fn sets_accept_and_content_type() {
        let method = MethodContract::post("create", "/items")
            .produces(ContentType::Json)
            .consumes(ContentType::Json);
        let headers = build(method, vec![]).expect("headers");

        assert_eq!(
            headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn no_content_type_on_bodyless_verb() {
        let method = MethodContract::get("list", "/items")
            .produces(ContentType::Json)
            .consumes(ContentType::Json);
        let headers = build(method, vec![]).expect("headers");

        assert!(headers.contains_key("Accept"));
        assert!(!headers.contains_key("Content-Type"));
    }

    #[test]
    fn binds_header_arguments() {
        let method = MethodContract::get("list", "/items")
            .param(Param::header("X-Request-Id", "String"))
            .param(Param::header("X-Trace", "Option<String>"))
            .param(Param::header("X-Roles", "Vec<String>"));
        let headers = build(
            method,
            vec![
                "req-1".into(),
                ArgValue::None,
                vec!["admin", "user"].into(),
            ],
        )
        .expect("headers");

        assert_eq!(
            headers.get("X-Request-Id").map(String::as_str),
            Some("req-1")
        );
        assert!(!headers.contains_key("X-Trace"));
        assert_eq!(
            headers.get("X-Roles").map(String::as_str),
            Some("admin, user")
        );
    }

    #[test]
    fn rejects_structured_header_value() {
        let method =
            MethodContract::get("list", "/items").param(Param::header("X-Data", "Value"));
        let err = build(method, vec![ArgValue::Json(serde_json::json!(1))])
            .expect_err("structured header");
        assert!(err.to_string().contains("header parameter `X-Data`"));
    }
}
