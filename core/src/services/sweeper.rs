//! Periodic removal of expired challenges and drafts
//!
//! Reads already ignore expired entries; the sweeper only bounds memory held
//! by abandoned signups.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use hs_shared::SweepConfig;

use crate::services::draft::SignupDraftStore;
use crate::services::otp::{CodeHasher, OtpLedger};

/// Background sweeper over the OTP ledger and the draft store
pub struct ExpirySweeper<H: CodeHasher + 'static> {
    ledger: Arc<OtpLedger<H>>,
    drafts: Arc<SignupDraftStore>,
    config: SweepConfig,
}

impl<H: CodeHasher + 'static> ExpirySweeper<H> {
    pub fn new(ledger: Arc<OtpLedger<H>>, drafts: Arc<SignupDraftStore>, config: SweepConfig) -> Self {
        Self {
            ledger,
            drafts,
            config,
        }
    }

    /// Run a single sweep over both stores
    pub fn run_once(&self) -> SweepResult {
        let result = SweepResult {
            challenges_removed: self.ledger.purge_expired(),
            drafts_removed: self.drafts.purge_expired(),
        };

        if result.total_removed() > 0 {
            info!(
                challenges_removed = result.challenges_removed,
                drafts_removed = result.drafts_removed,
                event = "expiry_sweep",
                "Removed expired signup state"
            );
        } else {
            debug!(event = "expiry_sweep", "Nothing to sweep");
        }

        result
    }

    /// Spawn the sweep loop on the current tokio runtime.
    ///
    /// Returns `None` when sweeping is disabled. The first sweep runs
    /// immediately.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Expiry sweeper is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Expiry sweeper started"
            );

            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                self.run_once();
            }
        }))
    }
}

/// Counts from one sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    pub challenges_removed: usize,
    pub drafts_removed: usize,
}

impl SweepResult {
    pub fn total_removed(&self) -> usize {
        self.challenges_removed + self.drafts_removed
    }
}
