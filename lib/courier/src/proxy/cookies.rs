//! Request cookie building.

use std::collections::HashMap;

use courier_core::{Error, Result};

use super::contract::Binding;
use super::invocation::{ArgValue, InvocationParameters};

/// Builds the request cookies for one invocation.
pub trait CookiesBuilder: Send + Sync {
    /// Populate the outgoing cookie map.
    fn build(
        &self,
        parameters: &InvocationParameters,
        cookies: &mut HashMap<String, String>,
    ) -> Result<()>;
}

/// Default cookies builder: cookie-bound arguments into the cookie map,
/// skipping absent optional values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractCookiesBuilder;

impl CookiesBuilder for ContractCookiesBuilder {
    fn build(
        &self,
        parameters: &InvocationParameters,
        cookies: &mut HashMap<String, String>,
    ) -> Result<()> {
        for (param, value) in parameters.bound(Binding::Cookie) {
            match value {
                ArgValue::None => {}
                ArgValue::Scalar(v) => {
                    cookies.insert(param.name().to_string(), v.clone());
                }
                other => {
                    return Err(Error::invalid_request(format!(
                        "cookie parameter `{}` must be a scalar value, got {}",
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

    use super::super::contract::{MethodContract, Param};
    use super::*;

    #[test]
    fn binds_cookie_arguments() {
        let method = MethodContract::get("list", "/items")
            .param(Param::cookie("session", "String"))
            .param(Param::cookie("locale", "Option<String>"));
        let parameters = InvocationParameters::new(
            "dyn Api",
            Arc::new(method),
            vec!["abc123".into(), ArgValue::None],
        )
        .expect("parameters");

        let mut cookies = HashMap::new();
        ContractCookiesBuilder
            .build(&parameters, &mut cookies)
            .expect("cookies");

        assert_eq!(cookies.get("session").map(String::as_str), Some("abc123"));
        assert!(!cookies.contains_key("locale"));
    }

    #[test]
    fn rejects_repeated_cookie_value() {
        let method =
            MethodContract::get("list", "/items").param(Param::cookie("session", "Vec<String>"));
        let parameters = InvocationParameters::new(
            "dyn Api",
            Arc::new(method),
            vec![vec!["a", "b"].into()],
        )
        .expect("parameters");

        let mut cookies = HashMap::new();
        let err = ContractCookiesBuilder
            .build(&parameters, &mut cookies)
            .expect_err("repeated cookie");
        assert!(err.to_string().contains("cookie parameter `session`"));
    }
}
