//! In-memory ledger of one-time code challenges keyed by email

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use hs_shared::code::normalize_code_input;
use hs_shared::email::{mask_email, normalize_email};
use hs_shared::OtpConfig;

use crate::domain::entities::OtpChallenge;
use crate::errors::{DomainError, DomainResult, OtpRejection, ValidationError};
use crate::services::clock::{Clock, SystemClock};

use super::config::OtpLedgerConfig;
use super::generator::generate_code;
use super::hasher::{BcryptCodeHasher, CodeHasher};
use super::types::{ChallengeStatus, ResendOutcome, VerifyOutcome};

type ChallengeSlot = Arc<Mutex<OtpChallenge>>;

/// Process-wide OTP ledger holding at most one live challenge per email.
///
/// Each email maps to its own mutex-guarded challenge, so the
/// check-increment-compare-write sequence of `verify` is atomic per key while
/// different emails proceed independently. Issue and resend swap a fresh slot
/// into the map and mark the superseded challenge consumed under its own
/// mutex.
///
/// No code path waits on a challenge mutex while holding a map shard: lookups
/// clone the slot out before locking it, and `purge_expired` skips busy
/// slots. A slow verification therefore only delays callers for the same
/// email.
pub struct OtpLedger<H: CodeHasher = BcryptCodeHasher> {
    challenges: DashMap<String, ChallengeSlot>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    config: OtpLedgerConfig,
}

impl OtpLedger<BcryptCodeHasher> {
    /// Ledger using bcrypt at the configured cost and the system clock.
    ///
    /// Fails with [`DomainError::Validation`] when `config` does not validate.
    pub fn from_config(config: &OtpConfig) -> DomainResult<Self> {
        let ledger_config = OtpLedgerConfig::try_from(config)?;
        let hasher = BcryptCodeHasher::new(config.hash_cost)?;
        Ok(Self::new(Arc::new(hasher), Arc::new(SystemClock), ledger_config))
    }
}

impl<H: CodeHasher> OtpLedger<H> {
    pub fn new(hasher: Arc<H>, clock: Arc<dyn Clock>, config: OtpLedgerConfig) -> Self {
        Self {
            challenges: DashMap::new(),
            hasher,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &OtpLedgerConfig {
        &self.config
    }

    /// Start a new challenge for `email` and return the plaintext code.
    ///
    /// Any existing challenge is replaced unconditionally and the resend
    /// counter starts from zero. The caller delivers the code; it is not kept.
    pub fn issue(&self, email: &str) -> DomainResult<String> {
        let key = Self::key(email)?;
        let (code, challenge) = self.prepare(&key, 0)?;
        let challenge_id = challenge.id;

        let previous = self
            .challenges
            .insert(key.clone(), Arc::new(Mutex::new(challenge)));
        if let Some(previous) = previous {
            Self::lock(&previous)?.consume();
        }

        info!(
            email = %mask_email(&key),
            challenge_id = %challenge_id,
            event = "otp_issued",
            "Issued new verification code"
        );

        Ok(code)
    }

    /// Replace the current challenge with a fresh code.
    ///
    /// Refused with [`OtpRejection::ResendLimitReached`] when an active
    /// challenge has already been resent `max_resends` times. Otherwise the
    /// previous challenge is consumed and the new one carries its resend count
    /// plus one, with attempts reset.
    ///
    /// The count is carried from whatever entry is still in the ledger,
    /// including consumed or expired ones. Once an entry is gone (expired
    /// challenge removed by `verify` or `status`, `invalidate`, `purge_expired`)
    /// the next resend starts a new episode at one.
    pub fn resend(&self, email: &str) -> DomainResult<ResendOutcome> {
        let key = Self::key(email)?;
        let mut prepared: Option<(String, String)> = None;

        loop {
            let current = self.slot(&key);

            // Refuse before paying for a hash
            if let Some(slot) = &current {
                let challenge = Self::lock(slot)?;
                if self.resend_limited(&challenge, &key) {
                    return Ok(ResendOutcome::Rejected(OtpRejection::ResendLimitReached));
                }
            }

            let (code, code_hash) = match prepared.take() {
                Some(pair) => pair,
                None => {
                    let code = generate_code()?;
                    let code_hash = self.hasher.hash(&code)?;
                    (code, code_hash)
                }
            };

            // The old challenge stays locked across the swap so no verify can
            // slip in between. No path waits on a challenge mutex under a shard.
            let mut previous = match &current {
                Some(slot) => Some(Self::lock(slot)?),
                None => None,
            };
            if let Some(challenge) = previous.as_deref() {
                if self.resend_limited(challenge, &key) {
                    return Ok(ResendOutcome::Rejected(OtpRejection::ResendLimitReached));
                }
            }

            let now = self.clock.now();
            let resend_count = previous
                .as_deref()
                .map_or(1, |challenge| challenge.resend_count.saturating_add(1));
            let challenge = self.build(&key, code_hash.clone(), resend_count, now);

            let swapped = match self.challenges.entry(key.clone()) {
                Entry::Occupied(mut occupied) => match &current {
                    Some(slot) if Arc::ptr_eq(occupied.get(), slot) => {
                        occupied.insert(Arc::new(Mutex::new(challenge)));
                        true
                    }
                    _ => false,
                },
                Entry::Vacant(vacant) if current.is_none() => {
                    vacant.insert(Arc::new(Mutex::new(challenge)));
                    true
                }
                Entry::Vacant(_) => false,
            };

            if !swapped {
                // Replaced or removed since the lookup; retry against the new state
                drop(previous);
                prepared = Some((code, code_hash));
                continue;
            }

            if let Some(challenge) = previous.as_deref_mut() {
                challenge.consume();
            }
            drop(previous);

            info!(
                email = %mask_email(&key),
                resend_count = resend_count,
                event = "otp_resent",
                "Resent verification code"
            );

            return Ok(ResendOutcome::Issued { code });
        }
    }

    /// Check a user-submitted code against the active challenge.
    ///
    /// The submitted input is reduced to digits, truncated to six and
    /// left-padded. The attempt counter is checked before it is incremented,
    /// and the deciding comparison counts as an attempt.
    pub fn verify(&self, email: &str, submitted: &str) -> DomainResult<VerifyOutcome> {
        let key = normalize_email(email);
        let Some(slot) = self.slot(&key) else {
            return Ok(VerifyOutcome::Rejected(OtpRejection::NoActiveChallenge));
        };

        let now = self.clock.now();
        let mut challenge = Self::lock(&slot)?;

        if challenge.consumed {
            return Ok(VerifyOutcome::Rejected(OtpRejection::NoActiveChallenge));
        }

        if challenge.is_expired_at(now) {
            let challenge_id = challenge.id;
            drop(challenge);
            self.remove_slot(&key, &slot);
            info!(
                email = %mask_email(&key),
                challenge_id = %challenge_id,
                event = "otp_expired",
                "Verification code expired"
            );
            return Ok(VerifyOutcome::Rejected(OtpRejection::Expired));
        }

        if challenge.attempts >= self.config.max_attempts {
            warn!(
                email = %mask_email(&key),
                challenge_id = %challenge.id,
                attempts = challenge.attempts,
                event = "max_attempts_exceeded",
                "Maximum verification attempts exceeded"
            );
            return Ok(VerifyOutcome::Rejected(OtpRejection::AttemptsExhausted));
        }

        challenge.attempts += 1;

        let matched = match normalize_code_input(submitted) {
            Some(code) => self.hasher.verify(&code, &challenge.code_hash)?,
            None => false,
        };

        if matched {
            challenge.consume();
            info!(
                email = %mask_email(&key),
                challenge_id = %challenge.id,
                attempts = challenge.attempts,
                event = "otp_verified_success",
                "Verification code successfully verified"
            );
            Ok(VerifyOutcome::Verified)
        } else {
            warn!(
                email = %mask_email(&key),
                challenge_id = %challenge.id,
                remaining_attempts = challenge.remaining_attempts(self.config.max_attempts),
                event = "otp_verification_failed",
                "Verification code verification failed"
            );
            Ok(VerifyOutcome::Rejected(OtpRejection::InvalidCode))
        }
    }

    /// Snapshot of the active challenge for `email`, if any.
    ///
    /// Expired challenges are removed on read.
    pub fn status(&self, email: &str) -> DomainResult<Option<ChallengeStatus>> {
        let key = normalize_email(email);
        let Some(slot) = self.slot(&key) else {
            return Ok(None);
        };

        let now = self.clock.now();
        let challenge = Self::lock(&slot)?;
        if challenge.consumed {
            return Ok(None);
        }
        if challenge.is_expired_at(now) {
            drop(challenge);
            self.remove_slot(&key, &slot);
            return Ok(None);
        }

        Ok(Some(ChallengeStatus {
            attempts: challenge.attempts,
            remaining_attempts: challenge.remaining_attempts(self.config.max_attempts),
            resend_count: challenge.resend_count,
            remaining_resends: challenge.remaining_resends(self.config.max_resends),
            created_at: challenge.created_at,
            expires_at: challenge.expires_at,
        }))
    }

    /// Drop any challenge for `email`. Returns whether one was present.
    pub fn invalidate(&self, email: &str) -> bool {
        let key = normalize_email(email);
        let removed = self.challenges.remove(&key).is_some();
        if removed {
            debug!(
                email = %mask_email(&key),
                event = "otp_invalidated",
                "Invalidated verification code"
            );
        }
        removed
    }

    /// Remove consumed and expired challenges; returns how many were dropped.
    ///
    /// Purely bounds memory. Reads already treat such entries as absent.
    /// Challenges locked by an in-flight operation are left for the next pass
    /// so the shard is never held while waiting on a verification.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.challenges.retain(|_, slot| {
            let keep = match slot.try_lock() {
                Ok(challenge) => challenge.is_active_at(now),
                Err(TryLockError::WouldBlock) => true,
                Err(TryLockError::Poisoned(_)) => false,
            };
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of tracked entries, including ones not yet lazily removed
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    fn key(email: &str) -> DomainResult<String> {
        let key = normalize_email(email);
        if key.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "email".to_string(),
            }
            .into());
        }
        Ok(key)
    }

    fn prepare(&self, key: &str, resend_count: u32) -> DomainResult<(String, OtpChallenge)> {
        let code = generate_code()?;
        let code_hash = self.hasher.hash(&code)?;
        let challenge = self.build(key, code_hash, resend_count, self.clock.now());
        Ok((code, challenge))
    }

    fn build(
        &self,
        key: &str,
        code_hash: String,
        resend_count: u32,
        now: chrono::DateTime<chrono::Utc>,
    ) -> OtpChallenge {
        OtpChallenge::new(
            key.to_string(),
            code_hash,
            resend_count,
            now,
            self.config.code_lifetime,
        )
    }

    fn resend_limited(&self, challenge: &OtpChallenge, key: &str) -> bool {
        let limited = challenge.is_active_at(self.clock.now())
            && challenge.resend_count >= self.config.max_resends;
        if limited {
            warn!(
                email = %mask_email(key),
                challenge_id = %challenge.id,
                resend_count = challenge.resend_count,
                event = "otp_resend_limit_reached",
                "Verification code resend limit reached"
            );
        }
        limited
    }

    fn slot(&self, key: &str) -> Option<ChallengeSlot> {
        self.challenges.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove `key` only if it still maps to `slot`, so a concurrent issue is kept.
    fn remove_slot(&self, key: &str, slot: &ChallengeSlot) {
        self.challenges
            .remove_if(key, |_, current| Arc::ptr_eq(current, slot));
    }

    fn lock(slot: &ChallengeSlot) -> DomainResult<MutexGuard<'_, OtpChallenge>> {
        slot.lock()
            .map_err(|_| DomainError::internal("OTP challenge lock poisoned"))
    }
}
