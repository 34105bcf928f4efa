//! Per-call invocation state.
//!
//! [`InvocationParameters`] captures everything about a single proxy call:
//! the decorated target, the invoked method contract, and the actual
//! argument values. Instances live for exactly one invocation and are never
//! shared between calls, so concurrent callers do not interfere.

use std::sync::Arc;

use bytes::Bytes;
use courier_core::{Error, Result};

use super::contract::{Binding, MethodContract, Param};

// ============================================================================
// Argument Values
// ============================================================================

/// A single call-site argument value.
///
/// Scalars are rendered into paths, queries, headers, and cookies; `Json`
/// and `Bytes` feed the body inserter; `None` represents an absent optional
/// argument and is skipped wherever it is bound.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Absent optional argument.
    None,
    /// A single stringly-rendered value.
    Scalar(String),
    /// A repeated value (e.g., multi-valued query parameter).
    Repeated(Vec<String>),
    /// A structured payload for body insertion.
    Json(serde_json::Value),
    /// A raw byte payload, passed through unchanged.
    Bytes(Bytes),
}

impl ArgValue {
    /// Serializes any value into a structured [`ArgValue::Json`] argument.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// A short label for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Scalar(_) => "scalar",
            Self::Repeated(_) => "repeated",
            Self::Json(_) => "json",
            Self::Bytes(_) => "bytes",
        }
    }

    /// The scalar rendition, if this is a scalar argument.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<serde_json::Value> for ArgValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Bytes> for ArgValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl<T: ToString> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        Self::Repeated(values.iter().map(ToString::to_string).collect())
    }
}

macro_rules! scalar_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_arg!(bool, char, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, usize, f32, f64);

// ============================================================================
// Invocation Parameters
// ============================================================================

/// The state of one proxy invocation.
#[derive(Debug, Clone)]
pub struct InvocationParameters {
    target: &'static str,
    method: Arc<MethodContract>,
    args: Vec<ArgValue>,
}

impl InvocationParameters {
    /// Creates invocation parameters for one call.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the argument count does not match
    /// the declared parameter count.
    pub fn new(
        target: &'static str,
        method: Arc<MethodContract>,
        args: Vec<ArgValue>,
    ) -> Result<Self> {
        if args.len() != method.params().len() {
            return Err(Error::contract(format!(
                "method `{}` expects {} argument(s), got {}",
                method.descriptor(),
                method.params().len(),
                args.len()
            )));
        }
        Ok(Self {
            target,
            method,
            args,
        })
    }

    /// The decorated target type name.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        self.target
    }

    /// The invoked method contract.
    #[must_use]
    pub fn method(&self) -> &MethodContract {
        &self.method
    }

    /// The call-site argument values, in declaration order.
    #[must_use]
    pub fn args(&self) -> &[ArgValue] {
        &self.args
    }

    /// Iterate over (parameter, argument) pairs with the given binding.
    pub fn bound(&self, binding: Binding) -> impl Iterator<Item = (&Param, &ArgValue)> {
        self.method
            .params()
            .iter()
            .zip(self.args.iter())
            .filter(move |(param, _)| param.binding() == binding)
    }

    /// The body-bound (parameter, argument) pair, if declared.
    #[must_use]
    pub fn body(&self) -> Option<(&Param, &ArgValue)> {
        self.bound(Binding::Body).next()
    }
}
