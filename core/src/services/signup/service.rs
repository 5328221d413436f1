//! Email signup flow over the OTP ledger and the draft store

use std::sync::Arc;

use tracing::{error, info, warn};

use hs_shared::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::entities::SignupDraftInput;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::services::draft::SignupDraftStore;
use crate::services::otp::{CodeHasher, OtpLedger, ResendOutcome, VerifyOutcome};

use super::traits::EmailServiceTrait;
use super::types::{ConfirmOutcome, ResendCodeOutcome, SignupStarted};

/// Coordinates the signup verification flow.
///
/// The ledger and the draft store stay independent; this service decides
/// when each is touched. No lock is held across the email `.await`.
pub struct SignupService<M: EmailServiceTrait, H: CodeHasher> {
    ledger: Arc<OtpLedger<H>>,
    drafts: Arc<SignupDraftStore>,
    email_service: Arc<M>,
}

impl<M: EmailServiceTrait, H: CodeHasher> SignupService<M, H> {
    pub fn new(
        ledger: Arc<OtpLedger<H>>,
        drafts: Arc<SignupDraftStore>,
        email_service: Arc<M>,
    ) -> Self {
        Self {
            ledger,
            drafts,
            email_service,
        }
    }

    /// Store the pending profile, issue a code and email it.
    ///
    /// Restarting a signup replaces both the draft and the code. If the email
    /// cannot be sent the new code is invalidated and the draft kept, so the
    /// user can ask for a resend.
    pub async fn start_signup(
        &self,
        email: &str,
        input: SignupDraftInput,
    ) -> DomainResult<SignupStarted> {
        let key = normalize_email(email);
        if !is_valid_email(&key) {
            return Err(ValidationError::InvalidEmail.into());
        }

        self.drafts.save(&key, input)?;
        let code = self.ledger.issue(&key)?;
        let code_expires_at = self
            .ledger
            .status(&key)?
            .map(|status| status.expires_at)
            .ok_or_else(|| DomainError::internal("Issued verification code is missing"))?;

        let message_id = match self.email_service.send_verification_code(&key, &code).await {
            Ok(message_id) => message_id,
            Err(e) => {
                self.ledger.invalidate(&key);
                error!(
                    email = %mask_email(&key),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to send verification email"
                );
                return Err(DomainError::internal(format!(
                    "Failed to send verification email: {}",
                    e
                )));
            }
        };

        info!(
            email = %mask_email(&key),
            message_id = %message_id,
            event = "signup_started",
            "Signup started, verification code sent"
        );

        Ok(SignupStarted {
            email: key,
            message_id,
            code_expires_at,
        })
    }

    /// Issue and email a fresh code while the signup draft is alive.
    ///
    /// Hitting the resend limit ends the signup: draft and challenge are both
    /// dropped and the user must start over.
    pub async fn resend_code(&self, email: &str) -> DomainResult<ResendCodeOutcome> {
        let key = normalize_email(email);
        if let Err(rejection) = self.drafts.require(&key) {
            return Ok(ResendCodeOutcome::Rejected(rejection.into()));
        }

        let code = match self.ledger.resend(&key)? {
            ResendOutcome::Issued { code } => code,
            ResendOutcome::Rejected(rejection) => {
                if rejection.requires_restart() {
                    self.drafts.clear(&key);
                    self.ledger.invalidate(&key);
                    warn!(
                        email = %mask_email(&key),
                        event = "signup_aborted",
                        "Signup aborted after resend limit"
                    );
                }
                return Ok(ResendCodeOutcome::Rejected(rejection.into()));
            }
        };

        let message_id = self
            .email_service
            .send_verification_code(&key, &code)
            .await
            .map_err(|e| {
                error!(
                    email = %mask_email(&key),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to send verification email"
                );
                DomainError::internal(format!("Failed to send verification email: {}", e))
            })?;

        Ok(ResendCodeOutcome::Sent { message_id })
    }

    /// Verify a submitted code and return the pending draft on success.
    ///
    /// The draft is left in place; call [`SignupService::complete_signup`]
    /// once the account has been created.
    pub fn confirm_code(&self, email: &str, code: &str) -> DomainResult<ConfirmOutcome> {
        let key = normalize_email(email);

        match self.ledger.verify(&key, code)? {
            VerifyOutcome::Verified => match self.drafts.require(&key) {
                Ok(draft) => Ok(ConfirmOutcome::Confirmed(draft)),
                Err(rejection) => {
                    warn!(
                        email = %mask_email(&key),
                        reason = rejection.code(),
                        event = "signup_draft_unavailable",
                        "Code verified but signup draft is unavailable"
                    );
                    Ok(ConfirmOutcome::Rejected(rejection.into()))
                }
            },
            VerifyOutcome::Rejected(rejection) => Ok(ConfirmOutcome::Rejected(rejection.into())),
        }
    }

    /// Drop all signup state for `email` after the account was created
    pub fn complete_signup(&self, email: &str) {
        let key = normalize_email(email);
        self.drafts.clear(&key);
        self.ledger.invalidate(&key);
        info!(
            email = %mask_email(&key),
            event = "signup_completed",
            "Signup state cleared"
        );
    }
}
