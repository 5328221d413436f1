//! OTP ledger module for email signup verification
//!
//! This module provides the one-time code workflow:
//! - Cryptographically random 6-digit code generation
//! - Salted hashing of codes (bcrypt by default)
//! - Issue, resend and verify with expiry, attempt and resend limits
//! - Per-email atomic state transitions over a shared in-memory map

mod config;
mod generator;
mod hasher;
mod ledger;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpLedgerConfig;
pub use generator::generate_code;
pub use hasher::{BcryptCodeHasher, CodeHasher, SaltedSha256CodeHasher};
pub use ledger::OtpLedger;
pub use types::{ChallengeStatus, ResendOutcome, VerifyOutcome};
