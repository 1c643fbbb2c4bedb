//! Transfer Failure Taxonomy
//!
//! Every failure mode of a transfer attempt is converted into one
//! structured value so callers can render `{message}` without inspecting
//! exception types or special-casing control flow. Amounts embedded in
//! messages use the fixed 8-decimal token format.

use thiserror::Error;

use crate::amount::format_tokens;
use crate::ledger::TransferRejection;

/// User-presentable transfer failure.
///
/// Business rejections from the ledger, transport failures, and local
/// validation failures all map into this one closed set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferFailure {
    /// No identity is available to act as the transfer source.
    #[error("no identity available")]
    NoIdentity,

    /// Destination text matched neither the raw-address nor principal form.
    #[error("invalid destination address")]
    InvalidAddress,

    /// Amount or fee string did not parse as a non-negative decimal.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Ledger rejected for lack of funds; carries the balance at rejection
    /// time, formatted.
    #[error("insufficient funds, current balance: {balance}")]
    InsufficientFunds { balance: String },

    /// Ledger rejected the supplied fee; carries its expected fee, formatted.
    #[error("fee mismatch, ledger expects: {expected}")]
    FeeMismatch { expected: String },

    /// Submission too old relative to ledger time.
    #[error("transaction too old")]
    StaleTransaction,

    /// Duplicate submission; carries the block of the original.
    #[error("duplicate transaction, original block: {original}")]
    DuplicateTransaction { original: u64 },

    /// Submission timestamp ahead of ledger time.
    #[error("transaction created in the future")]
    FutureTransaction,

    /// Transport or decoding failure, distinct from ledger rejections.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The ledger returned a shape outside the known result set.
    #[error("unexpected ledger result: {0}")]
    UnexpectedResult(String),
}

impl From<TransferRejection> for TransferFailure {
    fn from(rejection: TransferRejection) -> Self {
        match rejection {
            TransferRejection::InsufficientFunds { balance } => TransferFailure::InsufficientFunds {
                balance: format_tokens(balance.e8s),
            },
            TransferRejection::BadFee { expected_fee } => TransferFailure::FeeMismatch {
                expected: format_tokens(expected_fee.e8s),
            },
            TransferRejection::TxTooOld { .. } => TransferFailure::StaleTransaction,
            TransferRejection::TxDuplicate { duplicate_of } => {
                TransferFailure::DuplicateTransaction {
                    original: duplicate_of,
                }
            }
            TransferRejection::TxCreatedInFuture => TransferFailure::FutureTransaction,
            TransferRejection::Unrecognized(shape) => TransferFailure::UnexpectedResult(shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Tokens;

    #[test]
    fn insufficient_funds_embeds_formatted_balance() {
        let failure = TransferFailure::from(TransferRejection::InsufficientFunds {
            balance: Tokens::from_e8s(500_000_000),
        });
        assert_eq!(
            failure.to_string(),
            "insufficient funds, current balance: 5.00000000"
        );
    }

    #[test]
    fn bad_fee_embeds_expected_fee() {
        let failure = TransferFailure::from(TransferRejection::BadFee {
            expected_fee: Tokens::from_e8s(10_000),
        });
        assert_eq!(failure.to_string(), "fee mismatch, ledger expects: 0.00010000");
    }

    #[test]
    fn duplicate_carries_original_block() {
        let failure = TransferFailure::from(TransferRejection::TxDuplicate { duplicate_of: 99 });
        assert_eq!(
            failure,
            TransferFailure::DuplicateTransaction { original: 99 }
        );
    }

    #[test]
    fn timing_rejections_map_to_their_variants() {
        assert_eq!(
            TransferFailure::from(TransferRejection::TxTooOld {
                allowed_window_nanos: 0
            }),
            TransferFailure::StaleTransaction
        );
        assert_eq!(
            TransferFailure::from(TransferRejection::TxCreatedInFuture),
            TransferFailure::FutureTransaction
        );
    }
}
