//! Samurai API client
//!
//! One method per RPC of the Samurai service:
//! - System: server info
//! - Account: managed URIs, balance
//! - Phonebook: entry listing and retrieval
//! - Sessions: initiate, status, close
//!
//! # Usage
//!
//! ```rust,ignore
//! use samurai::api::SamuraiClient;
//!
//! let client = SamuraiClient::from_config(&SamuraiConfig::new("user", "pass"))?;
//! let uris = client.own_uri_list().await?;
//! ```

mod accounts;
mod client;
mod phonebook;
mod sessions;
mod types;

pub use client::SamuraiClient;
pub use types::*;
