//! Result types for OTP ledger operations

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::OtpRejection;

/// Outcome of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code matched; the challenge is now consumed
    Verified,
    Rejected(OtpRejection),
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }

    pub fn rejection(&self) -> Option<OtpRejection> {
        match self {
            VerifyOutcome::Verified => None,
            VerifyOutcome::Rejected(rejection) => Some(*rejection),
        }
    }
}

/// Outcome of a resend request
#[derive(Clone, PartialEq, Eq)]
pub enum ResendOutcome {
    /// A fresh code was issued; the plaintext must be delivered and discarded
    Issued { code: String },
    Rejected(OtpRejection),
}

impl ResendOutcome {
    pub fn is_issued(&self) -> bool {
        matches!(self, ResendOutcome::Issued { .. })
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ResendOutcome::Issued { code } => Some(code),
            ResendOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<OtpRejection> {
        match self {
            ResendOutcome::Issued { .. } => None,
            ResendOutcome::Rejected(rejection) => Some(*rejection),
        }
    }
}

impl std::fmt::Debug for ResendOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResendOutcome::Issued { .. } => f
                .debug_struct("Issued")
                .field("code", &"<redacted>")
                .finish(),
            ResendOutcome::Rejected(rejection) => f.debug_tuple("Rejected").field(rejection).finish(),
        }
    }
}

/// Read-only view of an active challenge; never exposes the code hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeStatus {
    pub attempts: u32,
    pub remaining_attempts: u32,
    pub resend_count: u32,
    pub remaining_resends: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
