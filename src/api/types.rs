//! Data types of the Samurai XML-RPC API
//!
//! Replies are decoded with serde from the struct the server returns; field
//! names follow the Samurai specification. Arguments are turned into
//! [`Params`] explicitly so binary content keeps its `base64` wire type.

use serde::{Deserialize, Deserializer};
use std::fmt;

use samurai_rpc::{Params, Value};

// ============================================================================
// Method names
// ============================================================================

/// RPC methods consumed by the client
pub mod methods {
    pub const SERVER_INFO: &str = "system.serverInfo";
    pub const OWN_URI_LIST_GET: &str = "samurai.OwnUriListGet";
    pub const PHONEBOOK_LIST_GET: &str = "samurai.PhonebookListGet";
    pub const PHONEBOOK_ENTRY_GET: &str = "samurai.PhonebookEntryGet";
    pub const BALANCE_GET: &str = "samurai.BalanceGet";
    pub const SESSION_INITIATE: &str = "samurai.SessionInitiate";
    pub const SESSION_STATUS_GET: &str = "samurai.SessionStatusGet";
    pub const SESSION_CLOSE: &str = "samurai.SessionClose";
}

/// Status code of a session status query for a session that has ended
pub const STATUS_SESSION_ENDED: i64 = 512;

/// Accepts `null`/`<nil/>` for fields that otherwise have a default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Type of service / session identifiers
// ============================================================================

/// Type of service of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tos {
    Voice,
    Fax,
    Text,
}

impl Tos {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tos::Voice => "voice",
            Tos::Fax => "fax",
            Tos::Text => "text",
        }
    }
}

impl fmt::Display for Tos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-assigned session identifier
///
/// The wire carries it either as a string or as an integer; it is sent back
/// in the form it was received.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(untagged)]
pub enum SessionId {
    Text(String),
    Number(i64),
}

impl SessionId {
    pub fn to_value(&self) -> Value {
        match self {
            SessionId::Text(id) => Value::String(id.clone()),
            SessionId::Number(id) => Value::Int(*id),
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Text(id) => f.write_str(id),
            SessionId::Number(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        SessionId::Text(id.to_string())
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        SessionId::Number(id)
    }
}

// ============================================================================
// System Types
// ============================================================================

/// Reply of system.serverInfo
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerInfo {
    #[serde(rename = "SpecificationVersion", default, deserialize_with = "null_as_default")]
    pub specification_version: String,

    #[serde(rename = "ServerName", default, deserialize_with = "null_as_default")]
    pub server_name: String,

    #[serde(rename = "ServerVersion", default, deserialize_with = "null_as_default")]
    pub server_version: String,

    #[serde(rename = "ServerVendor", default, deserialize_with = "null_as_default")]
    pub server_vendor: String,
}

// ============================================================================
// Account Types
// ============================================================================

/// Reply of samurai.OwnUriListGet
#[derive(Debug, Clone, Deserialize)]
pub struct OwnUriListReply {
    #[serde(rename = "OwnUriList")]
    pub own_uri_list: Vec<OwnUri>,
}

/// One URI managed by the account
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OwnUri {
    #[serde(rename = "SipUri")]
    pub sip_uri: String,

    #[serde(rename = "TOS", default, deserialize_with = "null_as_default")]
    pub tos: Vec<String>,

    #[serde(rename = "UriAlias", default, deserialize_with = "null_as_default")]
    pub uri_alias: String,

    #[serde(rename = "E164Out", default, deserialize_with = "null_as_default")]
    pub e164_out: String,

    #[serde(rename = "E164In", default, deserialize_with = "null_as_default")]
    pub e164_in: Vec<String>,

    #[serde(rename = "DefaultUri", default)]
    pub default_uri: Option<bool>,
}

/// Reply of samurai.BalanceGet
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceReply {
    #[serde(rename = "CurrentBalance")]
    pub current_balance: CurrentBalance,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBalance {
    #[serde(rename = "Currency")]
    pub currency: String,

    #[serde(rename = "TotalIncludingVat")]
    pub total_including_vat: f64,

    #[serde(rename = "VatPercent", default)]
    pub vat_percent: Option<f64>,
}

// ============================================================================
// Phonebook Types
// ============================================================================

/// Reply of samurai.PhonebookListGet
#[derive(Debug, Clone, Deserialize)]
pub struct PhonebookListReply {
    #[serde(rename = "PhonebookList")]
    pub phonebook_list: Vec<PhonebookListEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhonebookListEntry {
    #[serde(rename = "EntryID")]
    pub entry_id: String,

    #[serde(rename = "EntryHash", default, deserialize_with = "null_as_default")]
    pub entry_hash: String,
}

/// Reply of samurai.PhonebookEntryGet
#[derive(Debug, Clone, Deserialize)]
pub struct PhonebookEntryReply {
    #[serde(rename = "EntryList")]
    pub entry_list: Vec<PhonebookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhonebookEntry {
    #[serde(rename = "EntryID")]
    pub entry_id: String,

    #[serde(rename = "EntryHash", default, deserialize_with = "null_as_default")]
    pub entry_hash: String,

    /// Raw vCard text
    #[serde(rename = "Entry")]
    pub entry: String,
}

// ============================================================================
// Session Types
// ============================================================================

/// Payload of a session
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Message body of a text session
    Text(String),
    /// Document of a fax session, sent as `base64`
    Binary(Vec<u8>),
}

/// Arguments of samurai.SessionInitiate
#[derive(Debug, Clone)]
pub struct SessionInitiateArgs {
    pub local_uri: String,
    pub remote_uri: String,
    pub tos: Tos,
    pub content: Option<Content>,
}

impl SessionInitiateArgs {
    pub fn into_params(self) -> Params {
        let mut params = Params::new();
        params.insert("LocalUri".to_string(), Value::String(self.local_uri));
        params.insert("RemoteUri".to_string(), Value::String(self.remote_uri));
        params.insert("TOS".to_string(), Value::from(self.tos.as_str()));
        match self.content {
            Some(Content::Text(text)) => {
                params.insert("Content".to_string(), Value::String(text));
            }
            Some(Content::Binary(bytes)) => {
                params.insert("Content".to_string(), Value::Base64(bytes));
            }
            None => {}
        }
        params
    }
}

/// Reply of samurai.SessionInitiate
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInitiateReply {
    #[serde(rename = "SessionID")]
    pub session_id: SessionId,
}

/// Reply of samurai.SessionStatusGet
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatusReply {
    #[serde(rename = "SessionStatus")]
    pub session_status: String,
}

/// Result of a session status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// 200, or 512 once the session has ended
    pub code: i64,
    pub status: String,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        self.code == STATUS_SESSION_ENDED
    }
}
