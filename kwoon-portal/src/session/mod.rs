//! Session state machine
//!
//! One session per portal process. The store owns it, replaces it wholesale
//! on every transition, and publishes each snapshot through a watch channel
//! for guards and views to observe.

mod store;
mod types;

pub use store::{InitOutcome, LoginOutcome, SessionStore};
pub use types::{Identity, IdentitySource, Session};
