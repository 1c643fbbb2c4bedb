//! Fee Estimation
//!
//! Advisory query for the ledger's current transfer fee. Estimation must
//! never block a transfer attempt, so every failure degrades to the fixed
//! default fee instead of propagating.

use std::sync::Arc;

use tracing::warn;

use crate::ledger::{LedgerService, Tokens};

/// Default transfer fee in e8s (0.0001 tokens), used when estimation is
/// unavailable and when the caller supplies no explicit fee.
pub const DEFAULT_TRANSFER_FEE_E8S: u64 = 10_000;

/// Asks the ledger for the current transfer fee, falling back to
/// [`DEFAULT_TRANSFER_FEE_E8S`] on any failure.
pub struct FeeEstimator {
    ledger: Arc<dyn LedgerService>,
}

impl FeeEstimator {
    pub fn new(ledger: Arc<dyn LedgerService>) -> Self {
        Self { ledger }
    }

    /// Estimate the current transfer fee. Never errors.
    pub async fn estimate(&self) -> Tokens {
        match self.ledger.transfer_fee().await {
            Ok(fee) => fee,
            Err(e) => {
                warn!("fee query failed, using default fee: {}", e);
                Tokens::from_e8s(DEFAULT_TRANSFER_FEE_E8S)
            }
        }
    }
}
