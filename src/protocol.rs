//! JSON-RPC envelope types.
//!
//! The demonstrated server speaks the JSON-RPC 1.0 dialect: requests carry
//! `method`, a positional `params` array and an `id`; responses carry
//! `result`, `error` and the echoed `id`, with exactly one of `result` and
//! `error` being non-null.
//!
//! ```text
//! --> {"method":"sayHello","params":[null],"id":1}
//! <-- {"id":1,"result":"hello","error":null}
//! ```
//!
//! Error members are accepted both as a bare string (1.0 servers) and as a
//! `{code, message, data}` object (2.0 servers).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing JSON-RPC request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Remote procedure name.
    pub method: String,
    /// Positional parameters; the single argument is wrapped in a one-element array.
    pub params: Vec<Value>,
    /// Correlation id, echoed by the server.
    pub id: u64,
}

impl JsonRpcRequest {
    /// Build a request carrying `param` as its single positional argument.
    pub fn new(method: impl Into<String>, param: Value, id: u64) -> Self {
        Self {
            method: method.into(),
            params: vec![param],
            id,
        }
    }
}

/// Incoming JSON-RPC response.
///
/// All members default to `None` so that servers omitting `result` on error
/// (or `error` on success) still decode.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl JsonRpcResponse {
    /// Whether the echoed id matches `expected`.
    ///
    /// Numeric ids are compared by value; a server that echoes the id as a
    /// string of digits is tolerated.
    pub fn id_matches(&self, expected: u64) -> bool {
        match &self.id {
            Some(Value::Number(n)) => n.as_u64() == Some(expected),
            Some(Value::String(s)) => s.parse::<u64>().ok() == Some(expected),
            _ => false,
        }
    }

    /// Split into the call outcome.
    ///
    /// A non-null `error` wins; otherwise `result` is returned, with an
    /// absent result treated as `null`.
    pub fn into_outcome(self) -> Result<Value, RemoteError> {
        match self.error {
            Some(err) if !err.is_null() => Err(RemoteError::from_value(err)),
            _ => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Error reported by the remote side of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    /// Numeric code, present only for object-form errors that carry one.
    pub code: Option<i64>,
    /// Human readable message.
    pub message: String,
    /// Optional additional data.
    pub data: Option<Value>,
}

impl RemoteError {
    /// Interpret a response `error` member.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(message) => Self {
                code: None,
                message,
                data: None,
            },
            Value::Object(mut map) => {
                let code = map.get("code").and_then(Value::as_i64);
                let message = match map.remove("message") {
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => Value::Object(map.clone()).to_string(),
                };
                let data = map.remove("data").filter(|d| !d.is_null());
                Self { code, message, data }
            }
            other => Self {
                code: None,
                message: other.to_string(),
                data: None,
            },
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RemoteError {}
