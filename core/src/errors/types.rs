//! Error and rejection types for signup verification
//!
//! Rejections are expected outcomes of user actions (wrong code, expired
//! session, exhausted limits). They are returned as values and their `Display`
//! text is suitable for showing to the user directly.

use thiserror::Error;

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid email format")]
    InvalidEmail,
}

/// Reasons an OTP resend or verification is refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpRejection {
    #[error("No active verification code. Please request a new OTP.")]
    NoActiveChallenge,

    #[error("Verification code has expired. Please resend OTP.")]
    Expired,

    #[error("Too many attempts. Please resend OTP.")]
    AttemptsExhausted,

    #[error("Resend limit reached. Please start signup again.")]
    ResendLimitReached,

    #[error("Invalid verification code.")]
    InvalidCode,
}

impl OtpRejection {
    /// Stable machine-readable identifier
    pub fn code(&self) -> &'static str {
        match self {
            OtpRejection::NoActiveChallenge => "NO_ACTIVE_CHALLENGE",
            OtpRejection::Expired => "OTP_EXPIRED",
            OtpRejection::AttemptsExhausted => "ATTEMPTS_EXHAUSTED",
            OtpRejection::ResendLimitReached => "RESEND_LIMIT_REACHED",
            OtpRejection::InvalidCode => "INVALID_CODE",
        }
    }

    /// Whether the user has to start the signup over rather than retry or resend
    pub fn requires_restart(&self) -> bool {
        matches!(self, OtpRejection::ResendLimitReached)
    }
}

/// Reasons a pending signup draft cannot be returned
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftRejection {
    #[error("Signup session not found. Please start signup again.")]
    DraftMissing,

    #[error("Signup session has expired. Please start signup again.")]
    DraftExpired,
}

impl DraftRejection {
    pub fn code(&self) -> &'static str {
        match self {
            DraftRejection::DraftMissing => "DRAFT_MISSING",
            DraftRejection::DraftExpired => "DRAFT_EXPIRED",
        }
    }
}

/// Any expected refusal in the signup flow
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupRejection {
    #[error(transparent)]
    Otp(#[from] OtpRejection),

    #[error(transparent)]
    Draft(#[from] DraftRejection),
}

impl SignupRejection {
    pub fn code(&self) -> &'static str {
        match self {
            SignupRejection::Otp(rejection) => rejection.code(),
            SignupRejection::Draft(rejection) => rejection.code(),
        }
    }

    /// Whether the user has to start the signup over
    pub fn requires_restart(&self) -> bool {
        match self {
            SignupRejection::Otp(rejection) => rejection.requires_restart(),
            SignupRejection::Draft(_) => true,
        }
    }
}
