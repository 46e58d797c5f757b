//! Kwoon Auth - Credential transport and persistence
//!
//! This crate owns the exchange of portal credentials for backend tokens and
//! the persistence of the granted token across restarts.

pub mod transport;
pub mod vault;

pub use transport::{CredentialGrant, CredentialTransport, HttpCredentialTransport};
pub use vault::TokenVault;
