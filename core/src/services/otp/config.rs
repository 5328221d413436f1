//! Configuration for the OTP ledger

use chrono::Duration;
use hs_shared::OtpConfig;

use crate::errors::DomainError;

/// Limits applied by [`super::OtpLedger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpLedgerConfig {
    /// Lifetime of each issued code
    pub code_lifetime: Duration,
    /// Comparisons allowed per code before a resend is required
    pub max_attempts: u32,
    /// Resends allowed per signup episode
    pub max_resends: u32,
}

impl Default for OtpLedgerConfig {
    fn default() -> Self {
        Self {
            code_lifetime: Duration::minutes(10),
            max_attempts: 6,
            max_resends: 5,
        }
    }
}

impl TryFrom<&OtpConfig> for OtpLedgerConfig {
    type Error = DomainError;

    /// Validates `config` first; out-of-range lifetimes are rejected, never clamped.
    fn try_from(config: &OtpConfig) -> Result<Self, Self::Error> {
        config
            .validate()
            .map_err(|message| DomainError::Validation { message })?;

        let code_lifetime =
            Duration::try_minutes(config.expires_minutes).ok_or_else(|| DomainError::Validation {
                message: format!("OTP expiry of {} minutes is out of range", config.expires_minutes),
            })?;

        Ok(Self {
            code_lifetime,
            max_attempts: config.max_attempts,
            max_resends: config.max_resends,
        })
    }
}
