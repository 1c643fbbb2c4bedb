//! TrustNet Ledger Client - Account & Transfer Subsystem
//!
//! An async, in-memory client over a remote token ledger: address
//! derivation, balance tracking with periodic refresh, fee estimation with
//! a fixed fallback, and transfer submission with a typed failure taxonomy.
//!
//! # Modules
//!
//! - [`account_id`] - Principal/subaccount types, address derivation, hex codec, user-input parsing
//! - [`amount`] - e8s conversion (1 token = 10^8 e8s), truncating decimal parse
//! - [`ledger`] - Wire types and the async `LedgerService` trait
//! - [`fee`] - Fee estimation with the fixed default fallback
//! - [`balance`] - Balance state machine, stale-result discard, cancellable auto-refresh
//! - [`transfer`] - Transfer validation, submission and rejection mapping
//! - [`error`] - User-presentable `TransferFailure` taxonomy
//! - [`wallet`] - Per-identity composition (sign-in/sign-out)
//! - [`config`] - Client configuration
//! - [`logging`] - Tracing subscriber setup

pub mod account_id;
pub mod amount;
pub mod balance;
pub mod config;
pub mod error;
pub mod fee;
pub mod ledger;
pub mod logging;
pub mod transfer;
pub mod wallet;

// Convenient re-exports at crate root
pub use account_id::{AccountIdentifier, Principal, Subaccount, parse_user_input};
pub use amount::{E8S_PER_TOKEN, format_tokens, parse_tokens};
pub use balance::{BalanceState, BalanceStatus, BalanceTracker};
pub use config::ClientConfig;
pub use error::TransferFailure;
pub use fee::{DEFAULT_TRANSFER_FEE_E8S, FeeEstimator};
pub use ledger::{
    LedgerError, LedgerService, Timestamp, Tokens, TransferArgs, TransferRejection, TransferResult,
};
pub use transfer::{TransferExecutor, TransferReceipt, TransferRequest};
pub use wallet::Wallet;
