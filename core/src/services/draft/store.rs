//! In-memory store of pending signup drafts

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use hs_shared::email::{mask_email, normalize_email};
use hs_shared::DraftConfig;

use crate::domain::entities::{SignupDraft, SignupDraftInput};
use crate::errors::{DomainResult, DraftRejection, ValidationError};
use crate::services::clock::{Clock, SystemClock};

use super::config::DraftStoreConfig;

/// Holds one pending registration payload per email until it is consumed,
/// cleared or expires.
///
/// Expiry is evaluated lazily: a read past the expiry instant removes the
/// draft and reports it absent.
pub struct SignupDraftStore {
    drafts: DashMap<String, SignupDraft>,
    clock: Arc<dyn Clock>,
    config: DraftStoreConfig,
}

impl SignupDraftStore {
    pub fn new(clock: Arc<dyn Clock>, config: DraftStoreConfig) -> Self {
        Self {
            drafts: DashMap::new(),
            clock,
            config,
        }
    }

    /// Store on the system clock; fails with
    /// [`crate::errors::DomainError::Validation`] when `config` does not validate.
    pub fn from_config(config: &DraftConfig) -> DomainResult<Self> {
        let store_config = DraftStoreConfig::try_from(config)?;
        Ok(Self::new(Arc::new(SystemClock), store_config))
    }

    pub fn config(&self) -> &DraftStoreConfig {
        &self.config
    }

    /// Store `input` for `email`, replacing any existing draft and restarting
    /// its expiry window.
    pub fn save(&self, email: &str, input: SignupDraftInput) -> DomainResult<()> {
        let key = normalize_email(email);
        if key.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "email".to_string(),
            }
            .into());
        }

        let draft = SignupDraft::from_input(input, self.clock.now())?;
        let replaced = self.drafts.insert(key.clone(), draft).is_some();

        info!(
            email = %mask_email(&key),
            replaced = replaced,
            event = "signup_draft_saved",
            "Saved signup draft"
        );
        Ok(())
    }

    /// The live draft for `email`, or `None` if missing or expired
    pub fn get(&self, email: &str) -> Option<SignupDraft> {
        self.require(email).ok()
    }

    /// Like [`SignupDraftStore::get`] but tells a missing draft from an expired one
    pub fn require(&self, email: &str) -> Result<SignupDraft, DraftRejection> {
        let key = normalize_email(email);
        let now = self.clock.now();
        let lifetime = self.config.draft_lifetime;

        // Release the read guard before removing from the same shard
        {
            let entry = self.drafts.get(&key).ok_or(DraftRejection::DraftMissing)?;
            if !entry.is_expired_at(now, lifetime) {
                return Ok(entry.value().clone());
            }
        }

        let removed = self
            .drafts
            .remove_if(&key, |_, draft| draft.is_expired_at(now, lifetime))
            .is_some();
        if removed {
            debug!(
                email = %mask_email(&key),
                event = "signup_draft_expired",
                "Signup draft expired"
            );
            return Err(DraftRejection::DraftExpired);
        }

        // Replaced or cleared concurrently between the two lookups
        match self.drafts.get(&key) {
            Some(entry) if !entry.is_expired_at(now, lifetime) => Ok(entry.value().clone()),
            Some(_) => Err(DraftRejection::DraftExpired),
            None => Err(DraftRejection::DraftMissing),
        }
    }

    /// Remove any draft for `email`; no-op when absent
    pub fn clear(&self, email: &str) {
        let key = normalize_email(email);
        if self.drafts.remove(&key).is_some() {
            debug!(
                email = %mask_email(&key),
                event = "signup_draft_cleared",
                "Cleared signup draft"
            );
        }
    }

    /// Remove every expired draft; returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let lifetime = self.config.draft_lifetime;
        let mut removed = 0;
        self.drafts.retain(|_, draft| {
            let keep = !draft.is_expired_at(now, lifetime);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
