//! Ledger Service Contract
//!
//! Wire types and the async trait for the remote token ledger. The ledger
//! is consumed as a black box: balance query, fee query, and transfer
//! submission. Rejection reasons form a closed tagged union so callers can
//! handle them exhaustively.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account_id::{AccountIdentifier, Subaccount};
use crate::amount::format_tokens;

// ============================================================================
// Wire Types
// ============================================================================

/// Token amount in e8s as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub e8s: u64,
}

impl Tokens {
    pub fn from_e8s(e8s: u64) -> Self {
        Self { e8s }
    }
}

impl std::fmt::Display for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_tokens(self.e8s))
    }
}

/// Ledger timestamp in nanoseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub timestamp_nanos: u64,
}

/// Arguments for the ledger's transfer operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferArgs {
    pub to: AccountIdentifier,
    pub fee: Tokens,
    pub memo: u64,
    pub from_subaccount: Option<Subaccount>,
    pub created_at_time: Option<Timestamp>,
    pub amount: Tokens,
}

/// Outcome of a submitted transfer as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransferResult {
    /// Committed at this block height (monotonically increasing sequence
    /// number assigned by the ledger).
    Committed { block_height: u64 },
    Rejected(TransferRejection),
}

/// Ledger-level rejection reasons.
///
/// `Unrecognized` is produced by the decoding layer when the ledger returns
/// a rejection shape outside the known set; it is surfaced as a bug signal
/// rather than swallowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransferRejection {
    TxTooOld { allowed_window_nanos: u64 },
    BadFee { expected_fee: Tokens },
    TxDuplicate { duplicate_of: u64 },
    TxCreatedInFuture,
    InsufficientFunds { balance: Tokens },
    Unrecognized(String),
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Transport and decoding failures, kept separate from ledger-level
/// business rejections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    #[error("malformed ledger response: {0}")]
    MalformedResponse(String),
}

// ============================================================================
// Service Trait
// ============================================================================

/// Async interface to the remote ledger.
///
/// Implementations wrap the actual RPC transport; tests substitute mocks.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Query the spendable balance of an account, keyed by raw address bytes.
    async fn account_balance(&self, account: &AccountIdentifier) -> Result<Tokens, LedgerError>;

    /// Query the current transfer fee.
    async fn transfer_fee(&self) -> Result<Tokens, LedgerError>;

    /// Submit a transfer. A `Ok(TransferResult::Rejected(_))` is a ledger
    /// decision; `Err(_)` is a transport or decoding failure.
    async fn transfer(&self, args: TransferArgs) -> Result<TransferResult, LedgerError>;
}

// ============================================================================
// Test Support
// ============================================================================


// ============================================================================
// Unit Tests
// ============================================================================
