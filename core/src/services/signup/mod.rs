//! Signup coordination module
//!
//! Ties the OTP ledger and the draft store together for the email signup flow:
//! - Start signup: store the draft, issue a code, email it
//! - Resend: issue a fresh code while the draft is alive
//! - Confirm: verify the code and hand back the pending draft
//! - Complete: drop all signup state once the account exists

mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use service::SignupService;
pub use traits::EmailServiceTrait;
pub use types::{ConfirmOutcome, ResendCodeOutcome, SignupStarted};
