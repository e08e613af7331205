//! Payload types exchanged with the demo server.
//!
//! Field names are capitalised on the wire (`A`, `B`, `S`, `Args`, `Str`),
//! so every field carries an explicit serde rename.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Nested pair carried inside [`Args`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inner {
    #[serde(rename = "A", default)]
    pub a: i64,
    #[serde(rename = "B", default)]
    pub b: i64,
}

/// Parameters of the `foo` procedure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Args {
    #[serde(rename = "A", default)]
    pub a: i64,
    #[serde(rename = "B", default)]
    pub b: i64,
    #[serde(rename = "S", default)]
    pub s: Inner,
}

impl Args {
    /// The literal arguments sent by the demo run.
    pub fn demo() -> Self {
        Self {
            a: 3,
            b: 10,
            s: Inner { a: 1, b: 2 },
        }
    }
}

/// Result of the `foo` procedure.
///
/// `Default` is the zero value shown when the call fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "Args", default, deserialize_with = "null_as_empty")]
    pub args: Vec<Args>,
    #[serde(rename = "Str", default)]
    pub text: String,
}

/// Servers written against nil-able slices send `null` for an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Args>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Args>>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}}}", self.a, self.b)
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {} {}}}", self.a, self.b, self.s)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{[")?;
        for (i, args) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", args)?;
        }
        write!(f, "] {}}}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_demo_args_wire_shape() {
        let value = serde_json::to_value(Args::demo()).unwrap();
        assert_eq!(value, json!({"A": 3, "B": 10, "S": {"A": 1, "B": 2}}));
    }

    #[test]
    fn test_reply_display_empty() {
        let reply = Reply {
            args: Vec::new(),
            text: "ok".to_string(),
        };
        assert_eq!(reply.to_string(), "{[] ok}");
        assert_eq!(Reply::default().to_string(), "{[] }");
    }

    #[test]
    fn test_reply_display_with_args() {
        let reply = Reply {
            args: vec![Args::demo(), Args::default()],
            text: "done".to_string(),
        };
        assert_eq!(reply.to_string(), "{[{3 10 {1 2}} {0 0 {0 0}}] done}");
    }

    #[test]
    fn test_reply_decodes_null_and_missing_fields() {
        let reply: Reply = serde_json::from_value(json!({"Args": null, "Str": "ok"})).unwrap();
        assert!(reply.args.is_empty());
        assert_eq!(reply.text, "ok");

        let reply: Reply = serde_json::from_value(json!({})).unwrap();
        assert_eq!(reply, Reply::default());
    }

    #[test]
    fn test_reply_decodes_nested_args() {
        let reply: Reply = serde_json::from_value(json!({
            "Args": [{"A": 3, "B": 10, "S": {"A": 1, "B": 2}}],
            "Str": "echo"
        }))
        .unwrap();
        assert_eq!(reply.args, vec![Args::demo()]);
    }
}
