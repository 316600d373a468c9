//! Scripted transport and reply builders shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use samurai::{Response, RpcTransport};
use samurai_rpc::{Params, Value};

/// Transport answering from a queue of canned responses
///
/// Every call is recorded. When the queue runs dry the transport answers
/// with a connection failure, like an unreachable server would.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Response>>,
    calls: Mutex<Vec<(String, Params)>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Response>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, response: Response) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(method, _)| method).collect()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn call(&self, method: &str, params: Params) -> Response {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Response::transport_failure(111, "Connection refused"))
    }
}

pub fn fields(pairs: Vec<(&str, Value)>) -> BTreeMap<String, Value> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Reply with the given status code and extra fields
pub fn reply(code: i64, extra: Vec<(&str, Value)>) -> Response {
    let mut all = fields(extra);
    all.insert("StatusCode".to_string(), Value::Int(code));
    all.insert(
        "StatusString".to_string(),
        Value::from(if code == 200 { "Method success" } else { "Method failed" }),
    );
    Response::reply(all)
}

pub fn ok(extra: Vec<(&str, Value)>) -> Response {
    reply(200, extra)
}

pub fn own_uri(sip_uri: &str, tos: Vec<&str>) -> Value {
    Value::Struct(fields(vec![
        ("SipUri", Value::from(sip_uri)),
        ("TOS", Value::from(tos)),
        ("UriAlias", Value::from("")),
        ("E164Out", Value::from("4930123456")),
        ("E164In", Value::from(vec!["4930123456"])),
        ("DefaultUri", Value::Bool(true)),
    ]))
}

pub fn own_uri_list(uris: Vec<Value>) -> Response {
    ok(vec![("OwnUriList", Value::Array(uris))])
}

pub fn two_uris() -> Response {
    own_uri_list(vec![
        own_uri("sip:2420000e0@sipgate.de", vec!["voice", "fax", "text"]),
        own_uri("sip:2420000e1@sipgate.de", vec!["voice"]),
    ])
}

pub fn vcard(name: &str, tel: &str) -> String {
    format!(
        "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:{}\r\nTEL;TYPE=work:{}\r\nEND:VCARD\r\n",
        name, tel
    )
}

pub fn phonebook_list(ids: Vec<(&str, &str)>) -> Response {
    ok(vec![(
        "PhonebookList",
        Value::Array(
            ids.into_iter()
                .map(|(id, hash)| {
                    Value::Struct(fields(vec![
                        ("EntryID", Value::from(id)),
                        ("EntryHash", Value::from(hash)),
                    ]))
                })
                .collect(),
        ),
    )])
}

pub fn phonebook_entries(entries: Vec<(&str, &str, String)>) -> Response {
    ok(vec![(
        "EntryList",
        Value::Array(
            entries
                .into_iter()
                .map(|(id, hash, card)| {
                    Value::Struct(fields(vec![
                        ("EntryID", Value::from(id)),
                        ("EntryHash", Value::from(hash)),
                        ("Entry", Value::from(card)),
                    ]))
                })
                .collect(),
        ),
    )])
}

pub fn session_initiated(session_id: &str) -> Response {
    ok(vec![("SessionID", Value::from(session_id))])
}

pub fn session_status(code: i64, status: &str) -> Response {
    reply(code, vec![("SessionStatus", Value::from(status))])
}
