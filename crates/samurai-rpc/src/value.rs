//! XML-RPC data model

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::BTreeMap;

/// Keyword arguments of a call, sent as a single `<struct>` parameter
pub type Params = BTreeMap<String, Value>;

/// One XML-RPC value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    /// `dateTime.iso8601`, kept verbatim
    DateTime(String),
    Base64(Vec<u8>),
    Array(Vec<Value>),
    Struct(BTreeMap<String, Value>),
    Nil,
}

impl Value {
    /// XML-RPC type tag used when encoding
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Double(_) => "double",
            Value::DateTime(_) => "dateTime.iso8601",
            Value::Base64(_) => "base64",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Nil => "nil",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::DateTime(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Converts into a JSON tree for serde-driven decoding of typed replies.
    ///
    /// `base64` becomes its encoded string, `dateTime.iso8601` its text and
    /// non-finite doubles `null`.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Int(i) => serde_json::Value::from(i),
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::String(s) | Value::DateTime(s) => serde_json::Value::String(s),
            Value::Double(d) => serde_json::Number::from_f64(d)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Base64(bytes) => serde_json::Value::String(STANDARD.encode(bytes)),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Value::into_json).collect())
            }
            Value::Struct(members) => serde_json::Value::Object(
                members
                    .into_iter()
                    .map(|(name, value)| (name, value.into_json()))
                    .collect(),
            ),
            Value::Nil => serde_json::Value::Null,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_json_nested() {
        let mut member = BTreeMap::new();
        member.insert("SipUri".to_string(), Value::from("sip:4930123456@sipgate.de"));
        member.insert("TOS".to_string(), Value::from(vec!["voice", "fax"]));

        let mut reply = BTreeMap::new();
        reply.insert("StatusCode".to_string(), Value::Int(200));
        reply.insert("OwnUriList".to_string(), Value::Array(vec![Value::Struct(member)]));

        let json = Value::Struct(reply).into_json();
        assert_eq!(json["StatusCode"], 200);
        assert_eq!(json["OwnUriList"][0]["TOS"][1], "fax");
    }

    #[test]
    fn test_base64_becomes_encoded_string() {
        let json = Value::Base64(b"%PDF".to_vec()).into_json();
        assert_eq!(json, serde_json::Value::String("JVBERg==".to_string()));
    }

    #[test]
    fn test_nan_double_becomes_null() {
        assert_eq!(Value::Double(f64::NAN).into_json(), serde_json::Value::Null);
    }
}
