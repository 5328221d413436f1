//! Shared utilities and common types for the HomeServe signup backend
//!
//! This crate provides functionality used across server modules:
//! - Configuration types (OTP, drafts, sweeper, environment, logging)
//! - Tracing subscriber bootstrap
//! - Utility functions (email normalization, one-time code input parsing)

pub mod config;
pub mod logging;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DraftConfig, Environment, LogFormat, LoggingConfig, OtpConfig, SweepConfig,
};
pub use logging::init_tracing;
pub use utils::{code, email};
