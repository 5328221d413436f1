//! One-time passcode challenge entity for email signup verification.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Active code challenge for one email address.
///
/// Only the salted hash of the code is held; the plaintext is returned to the
/// caller once at issuance and never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    /// Identifier used to correlate log events for this challenge
    pub id: Uuid,

    /// Normalized email address the code was sent to
    pub email: String,

    /// Salted hash of the 6-digit code
    pub code_hash: String,

    /// Failed or deciding comparisons made against this code
    pub attempts: u32,

    /// Codes issued by resend in the current signup episode
    pub resend_count: u32,

    /// Set once verified or superseded by a resend
    pub consumed: bool,

    pub created_at: DateTime<Utc>,

    /// The challenge is invalid at or after this instant
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Creates a fresh, unconsumed challenge with no attempts
    pub fn new(
        email: String,
        code_hash: String,
        resend_count: u32,
        created_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            code_hash,
            attempts: 0,
            resend_count,
            consumed: false,
            created_at,
            expires_at: created_at + lifetime,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Neither consumed nor expired
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && !self.is_expired_at(now)
    }

    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    pub fn remaining_resends(&self, max_resends: u32) -> u32 {
        max_resends.saturating_sub(self.resend_count)
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }
}

impl std::fmt::Debug for OtpChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpChallenge")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("code_hash", &"<redacted>")
            .field("attempts", &self.attempts)
            .field("resend_count", &self.resend_count)
            .field("consumed", &self.consumed)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge_at(now: DateTime<Utc>) -> OtpChallenge {
        OtpChallenge::new(
            "a@b.com".to_string(),
            "hash".to_string(),
            0,
            now,
            Duration::minutes(10),
        )
    }

    #[test]
    fn test_new_challenge() {
        let now = Utc::now();
        let challenge = challenge_at(now);

        assert_eq!(challenge.attempts, 0);
        assert_eq!(challenge.resend_count, 0);
        assert!(!challenge.consumed);
        assert_eq!(challenge.expires_at, now + Duration::minutes(10));
        assert!(challenge.is_active_at(now));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let challenge = challenge_at(now);

        assert!(!challenge.is_expired_at(now + Duration::minutes(10) - Duration::milliseconds(1)));
        assert!(challenge.is_expired_at(now + Duration::minutes(10)));
        assert!(!challenge.is_active_at(now + Duration::minutes(10)));
    }

    #[test]
    fn test_consumed_is_inactive() {
        let now = Utc::now();
        let mut challenge = challenge_at(now);
        challenge.consume();
        assert!(!challenge.is_active_at(now));
    }

    #[test]
    fn test_remaining_counters_saturate() {
        let mut challenge = challenge_at(Utc::now());
        challenge.attempts = 4;
        challenge.resend_count = 7;
        assert_eq!(challenge.remaining_attempts(6), 2);
        assert_eq!(challenge.remaining_attempts(3), 0);
        assert_eq!(challenge.remaining_resends(5), 0);
    }

    #[test]
    fn test_debug_redacts_hash() {
        let challenge = OtpChallenge::new(
            "a@b.com".to_string(),
            "$2b$04$secret".to_string(),
            0,
            Utc::now(),
            Duration::minutes(10),
        );
        let debug = format!("{:?}", challenge);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
