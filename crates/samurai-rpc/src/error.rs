use thiserror::Error;

/// Codec errors, turned into synthesized responses by the transport
#[derive(Debug, Error)]
pub enum XmlRpcError {
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid XML-RPC document: {0}")]
    Invalid(String),
}
