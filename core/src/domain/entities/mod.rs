//! Domain entities representing core business objects.

pub mod otp_challenge;
pub mod signup_draft;

pub use otp_challenge::OtpChallenge;
pub use signup_draft::{SignupDraft, SignupDraftInput};
