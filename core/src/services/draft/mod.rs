//! Signup draft store module
//!
//! Single-slot expiring cache of pending registration payloads keyed by email.

mod config;
mod store;


pub use config::DraftStoreConfig;
pub use store::SignupDraftStore;
