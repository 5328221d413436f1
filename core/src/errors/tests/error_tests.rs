//! Unit tests for domain error and rejection types

use crate::errors::{DomainError, DraftRejection, OtpRejection, SignupRejection, ValidationError};

#[test]
fn test_rejection_messages_are_user_facing() {
    assert_eq!(
        OtpRejection::AttemptsExhausted.to_string(),
        "Too many attempts. Please resend OTP."
    );
    assert!(OtpRejection::InvalidCode.to_string().contains("Invalid verification code"));
    assert!(DraftRejection::DraftExpired.to_string().contains("start signup again"));
}

#[test]
fn test_rejection_codes() {
    assert_eq!(OtpRejection::NoActiveChallenge.code(), "NO_ACTIVE_CHALLENGE");
    assert_eq!(OtpRejection::ResendLimitReached.code(), "RESEND_LIMIT_REACHED");
    assert_eq!(DraftRejection::DraftMissing.code(), "DRAFT_MISSING");
}

#[test]
fn test_signup_rejection_is_transparent() {
    let rejection: SignupRejection = OtpRejection::Expired.into();
    assert_eq!(rejection.to_string(), OtpRejection::Expired.to_string());
    assert_eq!(rejection.code(), "OTP_EXPIRED");
    assert!(!rejection.requires_restart());

    let rejection: SignupRejection = DraftRejection::DraftMissing.into();
    assert!(rejection.requires_restart());

    let rejection: SignupRejection = OtpRejection::ResendLimitReached.into();
    assert!(rejection.requires_restart());
}

#[test]
fn test_validation_error_conversion() {
    let error: DomainError = ValidationError::RequiredField {
        field: "password".to_string(),
    }
    .into();
    assert!(matches!(error, DomainError::ValidationErr(_)));
    assert_eq!(error.to_string(), "Field required: password");
}

#[test]
fn test_internal_error_message() {
    let error = DomainError::internal("hash failure");
    assert_eq!(error.to_string(), "Internal error: hash failure");
}
