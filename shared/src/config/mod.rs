//! Configuration module with business-specific sub-modules
//!
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP challenge, signup draft and sweeper settings

pub mod environment;
pub mod otp;

use serde::{Deserialize, Serialize};

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{DraftConfig, OtpConfig, SweepConfig};

/// Complete configuration of the signup verification service
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,

    #[serde(default)]
    pub otp: OtpConfig,

    #[serde(default)]
    pub draft: DraftConfig,

    #[serde(default)]
    pub sweep: SweepConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            otp: OtpConfig::from_env(),
            draft: DraftConfig::from_env(),
            sweep: SweepConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Load dotenv files for the current environment, then read and validate
    /// the configuration.
    ///
    /// Variables already present in the process environment win over files.
    pub fn load() -> Result<Self, String> {
        let environment = Environment::from_env();
        let _ = dotenvy::from_filename(environment.env_file());
        let _ = dotenvy::dotenv();

        let config = Self::from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.otp.validate()?;
        self.draft.validate()?;
        self.sweep.validate()?;
        Ok(())
    }
}
