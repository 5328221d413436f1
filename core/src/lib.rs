//! # HomeServe Core
//!
//! Signup verification core for the HomeServe backend: the in-memory OTP
//! ledger that issues, resends and verifies one-time email codes, and the
//! store that holds pending signup drafts until the account is created.
//!
//! Both stores are plain objects meant to be constructed once at startup and
//! shared through `Arc`; nothing here is a global.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
