//! Kwoon Core - Shared data structures and infrastructure
//!
//! This crate defines the types, errors, configuration, and logging shared by
//! the rest of the kwoon portal workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
