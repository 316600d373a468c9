//! XML-RPC plumbing for the Samurai client
//!
//! - [`Value`] / [`Params`]: the XML-RPC data model
//! - [`codec`]: `<methodCall>` encoding and `<methodResponse>` decoding
//! - [`RpcTransport`]: the transport seam, with [`HttpTransport`] as the
//!   production implementation
//! - [`Response`]: the normalized response every call produces

pub mod codec;
mod error;
pub mod response;
pub mod transport;
pub mod value;

pub use error::XmlRpcError;
pub use response::{fault_codes, Response, ResponseKind, STATUS_OK};
pub use transport::{HttpTransport, RpcTransport};
pub use value::{Params, Value};

#[cfg(feature = "testing")]
pub use transport::MockRpcTransport;
