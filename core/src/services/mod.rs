//! Business services containing signup verification logic.

pub mod clock;
pub mod draft;
pub mod otp;
pub mod signup;
pub mod sweeper;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use draft::{DraftStoreConfig, SignupDraftStore};
pub use otp::{
    BcryptCodeHasher, ChallengeStatus, CodeHasher, OtpLedger, OtpLedgerConfig, ResendOutcome,
    SaltedSha256CodeHasher, VerifyOutcome,
};
pub use signup::{ConfirmOutcome, EmailServiceTrait, ResendCodeOutcome, SignupService, SignupStarted};
pub use sweeper::{ExpirySweeper, SweepResult};
