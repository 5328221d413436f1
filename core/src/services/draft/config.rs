//! Configuration for the signup draft store

use chrono::Duration;
use hs_shared::DraftConfig;

use crate::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftStoreConfig {
    /// How long a draft stays retrievable after it was saved
    pub draft_lifetime: Duration,
}

impl Default for DraftStoreConfig {
    fn default() -> Self {
        Self {
            draft_lifetime: Duration::minutes(30),
        }
    }
}

impl TryFrom<&DraftConfig> for DraftStoreConfig {
    type Error = DomainError;

    fn try_from(config: &DraftConfig) -> Result<Self, Self::Error> {
        config
            .validate()
            .map_err(|message| DomainError::Validation { message })?;

        let draft_lifetime =
            Duration::try_minutes(config.expires_minutes).ok_or_else(|| DomainError::Validation {
                message: format!("Draft expiry of {} minutes is out of range", config.expires_minutes),
            })?;

        Ok(Self { draft_lifetime })
    }
}
