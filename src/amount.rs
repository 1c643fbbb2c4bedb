//! Amount Conversion Module
//!
//! Conversion between the internal `u64` e8s representation and the
//! client-facing decimal string representation. All conversions go through
//! this module.
//!
//! ## Internal Representation
//! - Amounts are stored as `u64` e8s: 1 token = 10^8 e8s
//! - Decimal input is scaled by 10^8 and truncated toward zero; excess
//!   precision is dropped, not rejected
//! - Zero is a valid amount; the ledger, not this client, enforces
//!   positivity for transfers

use rust_decimal::prelude::*;
use thiserror::Error;

/// e8s per token (10^8)
pub const E8S_PER_TOKEN: u64 = 100_000_000;

/// Token decimal places
pub const TOKEN_DECIMALS: u32 = 8;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("amount must not be negative")]
    Negative,

    #[error("amount too large, would overflow")]
    Overflow,
}

// ============================================================================
// Parse: Client -> Internal (String -> u64)
// ============================================================================

/// Convert a decimal token string to e8s, truncating toward zero.
///
/// # Example
/// ```
/// use trustnet_ledger_client::amount::parse_tokens;
/// assert_eq!(parse_tokens("1.23456789").unwrap(), 123_456_789);
/// // Excess precision is truncated, never rounded up
/// assert_eq!(parse_tokens("1.234567891").unwrap(), 123_456_789);
/// ```
pub fn parse_tokens(text: &str) -> Result<u64, AmountError> {
    let decimal: Decimal = text
        .trim()
        .parse()
        .map_err(|e: rust_decimal::Error| AmountError::InvalidFormat(e.to_string()))?;

    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(AmountError::Negative);
    }

    let scaled = decimal
        .checked_mul(Decimal::from(E8S_PER_TOKEN))
        .ok_or(AmountError::Overflow)?;

    scaled.trunc().to_u64().ok_or(AmountError::Overflow)
}

// ============================================================================
// Format: Internal -> Client (u64 -> String)
// ============================================================================

/// Convert e8s to the fixed 8-decimal display string.
///
/// # Example
/// ```
/// use trustnet_ledger_client::amount::format_tokens;
/// assert_eq!(format_tokens(500_000_000), "5.00000000");
/// ```
pub fn format_tokens(e8s: u64) -> String {
    let value = Decimal::from(e8s) / Decimal::from(E8S_PER_TOKEN);
    format!("{:.prec$}", value, prec = TOKEN_DECIMALS as usize)
}

// ============================================================================
// Unit Tests
// ============================================================================
