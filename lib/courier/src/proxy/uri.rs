//! Request URI building.

use courier_core::{Error, Result};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use super::contract::Binding;
use super::invocation::{ArgValue, InvocationParameters};

/// Builds the request URI for one invocation.
pub trait UriBuilder: Send + Sync {
    /// Build the full request URL from the invocation and the proxy base URL.
    fn build(&self, parameters: &InvocationParameters, base_url: &Url) -> Result<Url>;
}

/// Characters percent-encoded inside a substituted path segment.
///
/// Everything a segment may not contain raw: whitespace, quoting, template
/// braces, separators, and the escape character itself.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Default URI builder.
///
/// Substitutes `{name}` placeholders in the method path template with the
/// percent-encoded path-bound argument values, appends the result to the
/// base URL path, and adds query-bound arguments as query pairs. Absent
/// optional query values are skipped; repeated values produce repeated
/// pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateUriBuilder;

impl UriBuilder for TemplateUriBuilder {
    fn build(&self, parameters: &InvocationParameters, base_url: &Url) -> Result<Url> {
        let method = parameters.method();

        let mut path = method.path().to_string();
        for (param, value) in parameters.bound(Binding::Path) {
            let Some(raw) = value.as_scalar() else {
                return Err(Error::invalid_request(format!(
                    "path parameter `{}` must be a scalar value, got {}",
                    param.name(),
                    value.kind()
                )));
            };
            let encoded = utf8_percent_encode(raw, PATH_SEGMENT).to_string();
            path = path.replace(&format!("{{{}}}", param.name()), &encoded);
        }

        let mut pairs = Vec::new();
        for (param, value) in parameters.bound(Binding::Query) {
            match value {
                ArgValue::None => {}
                ArgValue::Scalar(v) => pairs.push((param.name().to_string(), v.clone())),
                ArgValue::Repeated(values) => {
                    for v in values {
                        pairs.push((param.name().to_string(), v.clone()));
                    }
                }
                other => {
                    return Err(Error::invalid_request(format!(
                        "query parameter `{}` must be a scalar or repeated value, got {}",
                        param.name(),
                        other.kind()
                    )));
                }
            }
        }

        let mut url = base_url.clone();
        url.set_path(&join_paths(base_url.path(), &path));
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &pairs {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

fn join_paths(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        if base.is_empty() {
            "/".to_string()
        } else {
            base.to_string()
        }
    } else {
        format!("{base}/{path}")
    }
}
