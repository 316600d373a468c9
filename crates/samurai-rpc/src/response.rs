//! Normalized call response
//!
//! Every call yields a [`Response`]: a struct-shaped mapping carrying at least
//! `StatusCode`. Transport problems and remote faults are folded into the same
//! shape, so the transport never fails past its boundary.

use std::collections::BTreeMap;

use crate::value::Value;

pub const STATUS_CODE: &str = "StatusCode";
pub const STATUS_STRING: &str = "StatusString";

/// Success status of the Samurai service
pub const STATUS_OK: i64 = 200;

/// XML-RPC interop fault codes used for locally synthesized failures
pub mod fault_codes {
    /// Response body is not well-formed XML-RPC
    pub const PARSE_ERROR: i64 = -32700;
    /// Response does not follow the expected shape
    pub const INVALID_RESPONSE: i64 = -32600;
    /// Request could not be delivered
    pub const TRANSPORT_ERROR: i64 = -32300;
}

/// Where a response came from
///
/// Local metadata only, never part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The server answered with a struct
    Reply,
    /// The server answered with an XML-RPC fault
    Fault,
    /// The request or the response got lost or mangled on the way
    TransportFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    kind: ResponseKind,
    fields: BTreeMap<String, Value>,
}

impl Response {
    pub fn reply(fields: BTreeMap<String, Value>) -> Self {
        Self {
            kind: ResponseKind::Reply,
            fields,
        }
    }

    pub fn fault(code: i64, message: impl Into<String>) -> Self {
        Self::synthesized(ResponseKind::Fault, code, message.into())
    }

    pub fn transport_failure(code: i64, message: impl Into<String>) -> Self {
        Self::synthesized(ResponseKind::TransportFailure, code, message.into())
    }

    fn synthesized(kind: ResponseKind, code: i64, message: String) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(STATUS_CODE.to_string(), Value::Int(code));
        fields.insert(STATUS_STRING.to_string(), Value::String(message));
        Self { kind, fields }
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// `StatusCode` of the response, if present and an integer
    pub fn status_code(&self) -> Option<i64> {
        self.fields.get(STATUS_CODE).and_then(Value::as_i64)
    }

    pub fn status_string(&self) -> Option<&str> {
        self.fields.get(STATUS_STRING).and_then(Value::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.kind == ResponseKind::Reply && self.status_code() == Some(STATUS_OK)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }

    /// JSON view of all fields, for serde-driven decoding
    pub fn into_json(self) -> serde_json::Value {
        Value::Struct(self.fields).into_json()
    }
}
