//! Signup verification configuration: OTP challenges, drafts and the expiry sweeper

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lowest bcrypt cost accepted by the hashing primitive
pub const MIN_HASH_COST: u32 = 4;

/// Highest bcrypt cost accepted by the hashing primitive
pub const MAX_HASH_COST: u32 = 31;

/// Longest accepted challenge or draft lifetime, in minutes (7 days)
pub const MAX_EXPIRES_MINUTES: i64 = 7 * 24 * 60;

/// One-time passcode lifecycle settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Challenge lifetime in minutes (`OTP_EXPIRES_MINUTES`)
    #[serde(default = "default_expires_minutes")]
    pub expires_minutes: i64,

    /// Failed verifications allowed before a resend is required (`OTP_MAX_ATTEMPTS`)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Resends allowed per signup episode (`OTP_MAX_RESENDS`)
    #[serde(default = "default_max_resends")]
    pub max_resends: u32,

    /// bcrypt cost used when hashing codes (`OTP_HASH_COST`)
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expires_minutes: default_expires_minutes(),
            max_attempts: default_max_attempts(),
            max_resends: default_max_resends(),
            hash_cost: default_hash_cost(),
        }
    }
}

impl OtpConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            expires_minutes: parse_or(&lookup, "OTP_EXPIRES_MINUTES", defaults.expires_minutes),
            max_attempts: parse_or(&lookup, "OTP_MAX_ATTEMPTS", defaults.max_attempts),
            max_resends: parse_or(&lookup, "OTP_MAX_RESENDS", defaults.max_resends),
            hash_cost: parse_or(&lookup, "OTP_HASH_COST", defaults.hash_cost),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_EXPIRES_MINUTES).contains(&self.expires_minutes) {
            return Err(format!(
                "OTP expiry must be between 1 and {} minutes",
                MAX_EXPIRES_MINUTES
            ));
        }
        if self.max_attempts == 0 {
            return Err("OTP max attempts must be greater than zero".to_string());
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.hash_cost) {
            return Err(format!(
                "OTP hash cost must be between {} and {}",
                MIN_HASH_COST, MAX_HASH_COST
            ));
        }
        Ok(())
    }
}

/// Pending signup draft settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DraftConfig {
    /// Draft lifetime in minutes (`DRAFT_EXPIRES_MINUTES`)
    #[serde(default = "default_draft_expires_minutes")]
    pub expires_minutes: i64,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            expires_minutes: default_draft_expires_minutes(),
        }
    }
}

impl DraftConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            expires_minutes: parse_or(
                &lookup,
                "DRAFT_EXPIRES_MINUTES",
                default_draft_expires_minutes(),
            ),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_EXPIRES_MINUTES).contains(&self.expires_minutes) {
            return Err(format!(
                "Draft expiry must be between 1 and {} minutes",
                MAX_EXPIRES_MINUTES
            ));
        }
        Ok(())
    }
}

/// Background sweep of expired challenges and drafts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SweepConfig {
    /// Whether the sweeper task is started (`SWEEP_ENABLED`)
    #[serde(default = "default_sweep_enabled")]
    pub enabled: bool,

    /// Seconds between sweeps (`SWEEP_INTERVAL_SECONDS`)
    #[serde(default = "default_sweep_interval")]
    pub interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_sweep_enabled(),
            interval_seconds: default_sweep_interval(),
        }
    }
}

impl SweepConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            enabled: parse_or(&lookup, "SWEEP_ENABLED", default_sweep_enabled()),
            interval_seconds: parse_or(&lookup, "SWEEP_INTERVAL_SECONDS", default_sweep_interval()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.interval_seconds == 0 {
            return Err("Sweep interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn default_expires_minutes() -> i64 {
    10
}

fn default_max_attempts() -> u32 {
    6
}

fn default_max_resends() -> u32 {
    5
}

fn default_hash_cost() -> u32 {
    10
}

fn default_draft_expires_minutes() -> i64 {
    30
}

fn default_sweep_enabled() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    300
}
