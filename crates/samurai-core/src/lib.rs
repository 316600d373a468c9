//! Samurai Core Library
//!
//! Foundational pieces shared by the Samurai client crates:
//!
//! - Telephone number normalization into `sip:` URIs
//! - Client configuration
//! - Unified error handling

pub mod config;
pub mod error;
pub mod number;

pub use self::config::{SamuraiConfig, DEFAULT_SERVER_URL};
pub use error::SamuraiError;
pub use number::{normalize, NumberPlan};

/// Result type alias using SamuraiError
pub type SamuraiResult<T> = Result<T, SamuraiError>;
