//! Client library for the sipgate Samurai XML-RPC API
//!
//! An [`Account`] mirrors server state (managed URIs, phonebook, balance);
//! sessions are started from its [`Uri`]s and tracked as [`Session`]s.
//!
//! ```rust,no_run
//! use samurai::{Account, SamuraiConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), samurai::SamuraiError> {
//!     let config = SamuraiConfig::new("username", "password");
//!     let mut account = Account::new(&config)?;
//!
//!     account.update_managed_uris().await?;
//!     let remote = account.sip_uri_for("030 123456")?;
//!
//!     if let Some(uri) = account.uris_mut().first_mut() {
//!         let session_id = uri.call(&remote).await?;
//!         let status = uri.session(&session_id).unwrap().status().await?;
//!         println!("{}: {}", session_id, status.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod models;
pub mod vcard;

pub use api::{SamuraiClient, SessionId, SessionStatus, Tos};
pub use models::{Account, Balance, Contact, Phonebook, Session, Uri};
pub use samurai_core::{normalize, NumberPlan, SamuraiConfig, SamuraiError, SamuraiResult};
pub use samurai_rpc::{Response, ResponseKind, RpcTransport};
pub use vcard::{Card, CardParser, CardProperty, VcardParser};
