//! Types for signup flow results

use chrono::{DateTime, Utc};

use crate::domain::entities::SignupDraft;
use crate::errors::SignupRejection;

/// Result of starting a signup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupStarted {
    /// Normalized email the code was sent to
    pub email: String,
    /// Message id reported by the email provider
    pub message_id: String,
    /// When the issued code stops being accepted
    pub code_expires_at: DateTime<Utc>,
}

/// Result of a resend request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendCodeOutcome {
    Sent { message_id: String },
    Rejected(SignupRejection),
}

/// Result of submitting a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Code accepted; the pending draft is ready for account creation
    Confirmed(SignupDraft),
    Rejected(SignupRejection),
}

impl ConfirmOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmOutcome::Confirmed(_))
    }

    pub fn rejection(&self) -> Option<SignupRejection> {
        match self {
            ConfirmOutcome::Confirmed(_) => None,
            ConfirmOutcome::Rejected(rejection) => Some(*rejection),
        }
    }
}
