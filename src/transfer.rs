//! Transfer Execution
//!
//! Validates a caller-supplied transfer request, submits it to the ledger,
//! and maps the result into the [`TransferFailure`] taxonomy. A committed
//! transfer schedules exactly one fire-and-forget balance refresh; a failed
//! transfer has no side effects beyond the returned error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::account_id::{Subaccount, parse_user_input};
use crate::amount::parse_tokens;
use crate::balance::BalanceTracker;
use crate::error::TransferFailure;
use crate::fee::DEFAULT_TRANSFER_FEE_E8S;
use crate::ledger::{LedgerService, Tokens, TransferArgs, TransferResult};

/// Caller-facing transfer request. Destination and amounts are text, as
/// entered by the user.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub to: String,
    /// Decimal token amount, scaled to e8s with truncation.
    pub amount: String,
    /// Defaults to 0.
    pub memo: Option<u64>,
    /// Decimal token fee; defaults to the fixed standard fee. Callers
    /// wanting the live fee call [`FeeEstimator`](crate::fee::FeeEstimator)
    /// themselves; the executor never estimates implicitly.
    pub fee: Option<String>,
}

/// Outcome of a committed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    /// Sequence number assigned by the ledger, returned unchanged.
    pub block_height: u64,
}

/// Per-identity transfer executor.
///
/// Holds the source subaccount of the bound identity and a handle to that
/// identity's [`BalanceTracker`]; it requests refreshes but never writes
/// balance state itself.
pub struct TransferExecutor {
    ledger: Arc<dyn LedgerService>,
    tracker: Arc<BalanceTracker>,
    from_subaccount: Option<Subaccount>,
    in_flight: AtomicBool,
}

impl TransferExecutor {
    pub fn new(
        ledger: Arc<dyn LedgerService>,
        tracker: Arc<BalanceTracker>,
        from_subaccount: Option<Subaccount>,
    ) -> Self {
        Self {
            ledger,
            tracker,
            from_subaccount,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a transfer is currently being submitted. Advisory only, for
    /// caller-side backpressure; the executor does not serialize calls.
    pub fn is_transferring(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Validate and submit a transfer.
    ///
    /// Every failure mode comes back as a [`TransferFailure`] value, never
    /// a panic. On success the ledger's block height is returned unchanged
    /// and one balance refresh is scheduled after the submission resolved;
    /// the refresh is fire-and-forget and cannot affect the outcome.
    pub async fn transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferReceipt, TransferFailure> {
        self.in_flight.store(true, Ordering::SeqCst);
        let result = self.execute(request).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn execute(&self, request: TransferRequest) -> Result<TransferReceipt, TransferFailure> {
        // Local validation first; no network call on bad input.
        let to = parse_user_input(&request.to).ok_or(TransferFailure::InvalidAddress)?;

        let amount = parse_tokens(&request.amount)
            .map_err(|e| TransferFailure::InvalidAmount(e.to_string()))?;

        let fee = match &request.fee {
            Some(text) => {
                parse_tokens(text).map_err(|e| TransferFailure::InvalidAmount(e.to_string()))?
            }
            None => DEFAULT_TRANSFER_FEE_E8S,
        };

        let args = TransferArgs {
            to,
            fee: Tokens::from_e8s(fee),
            memo: request.memo.unwrap_or(0),
            from_subaccount: self.from_subaccount,
            created_at_time: None,
            amount: Tokens::from_e8s(amount),
        };

        debug!("submitting transfer of {} to {}", args.amount, to);

        match self.ledger.transfer(args).await {
            Ok(TransferResult::Committed { block_height }) => {
                info!("transfer committed at block {}", block_height);
                // Scheduled only after the submission resolved; its own
                // failure lands in balance state, not in this outcome.
                let tracker = Arc::clone(&self.tracker);
                tokio::spawn(async move { tracker.refresh().await });
                Ok(TransferReceipt { block_height })
            }
            Ok(TransferResult::Rejected(reason)) => {
                debug!("transfer rejected: {:?}", reason);
                Err(reason.into())
            }
            Err(e) => Err(TransferFailure::NetworkFailure(e.to_string())),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
