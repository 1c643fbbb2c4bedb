//! Account Identifier Codec
//!
//! Derivation, encoding and parsing of ledger account addresses.
//!
//! An account address is a 32-byte value derived from a principal and an
//! optional 32-byte subaccount: a SHA-224 digest over a domain separator,
//! the principal bytes and the subaccount bytes, prefixed with the
//! big-endian CRC32 of that digest. Derivation is pure and deterministic.
//!
//! User-supplied destination text is accepted in two forms:
//! - exactly 64 hex characters, decoded directly as a raw address
//! - anything else, tried as a principal text form and derived with the
//!   default subaccount
//!
//! Parsing never panics; unrecognized input yields `None`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224};
use thiserror::Error;

/// Domain separator for address derivation (length-prefixed "account-id")
const ACCOUNT_DOMAIN_SEPARATOR: &[u8] = b"\x0Aaccount-id";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("invalid principal text: {0}")]
    InvalidPrincipalText(String),

    #[error("principal must be 1..={max} bytes, got {got}", max = Principal::MAX_LEN)]
    InvalidPrincipalLength { got: usize },

    #[error("account identifier hex must be 64 characters, got {0}")]
    InvalidHexLength(usize),

    #[error("invalid hex character in account identifier")]
    InvalidHex,
}

// ============================================================================
// Principal
// ============================================================================

/// Opaque cryptographic identity of an account owner.
///
/// Issued by an external authentication collaborator; this crate only uses
/// it as derivation input. The canonical text form is URL-safe base64
/// without padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    bytes: Vec<u8>,
}

impl Principal {
    /// Maximum principal length in bytes
    pub const MAX_LEN: usize = 29;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressParseError> {
        if bytes.is_empty() || bytes.len() > Self::MAX_LEN {
            return Err(AddressParseError::InvalidPrincipalLength { got: bytes.len() });
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Parse the canonical text form.
    pub fn from_text(text: &str) -> Result<Self, AddressParseError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(text.trim())
            .map_err(|e| AddressParseError::InvalidPrincipalText(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn to_text(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

// ============================================================================
// Subaccount
// ============================================================================

/// Secondary 32-byte discriminator letting one principal control multiple
/// independent balances. The default subaccount is all zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subaccount(pub [u8; 32]);

// ============================================================================
// AccountIdentifier
// ============================================================================

/// 32-byte ledger-routable account address.
///
/// Layout: 4-byte big-endian CRC32 of the SHA-224 digest, then the 28-byte
/// digest itself. Equality is byte-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountIdentifier([u8; 32]);

impl AccountIdentifier {
    /// Derive the address for `(principal, subaccount)`.
    ///
    /// Pure: same inputs always yield the same address. A missing
    /// subaccount means the default (all-zero) subaccount.
    pub fn from_principal(principal: &Principal, subaccount: Option<&Subaccount>) -> Self {
        let mut hasher = Sha224::new();
        hasher.update(ACCOUNT_DOMAIN_SEPARATOR);
        hasher.update(principal.as_slice());
        hasher.update(subaccount.copied().unwrap_or_default().0);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&crc32fast::hash(&digest).to_be_bytes());
        bytes[4..].copy_from_slice(&digest);
        Self(bytes)
    }

    /// Decode the 64-character hex form.
    pub fn from_hex(text: &str) -> Result<Self, AddressParseError> {
        if text.len() != 64 {
            return Err(AddressParseError::InvalidHexLength(text.len()));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| AddressParseError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Canonical lowercase hex form, inverse of [`from_hex`](Self::from_hex).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl std::fmt::Display for AccountIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// User Input Parsing
// ============================================================================

/// Parse destination text pasted by a user.
///
/// 64 hex characters (either case) are taken as a raw account address.
/// Any other text is tried as a principal and derived with the default
/// subaccount. Returns `None` for everything else; never panics.
pub fn parse_user_input(text: &str) -> Option<AccountIdentifier> {
    let text = text.trim();
    if text.len() == 64 && text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return AccountIdentifier::from_hex(text).ok();
    }
    Principal::from_text(text)
        .ok()
        .map(|p| AccountIdentifier::from_principal(&p, None))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(tag: u8) -> Principal {
        Principal::from_slice(&[tag; 10]).unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let p = principal(1);
        let a = AccountIdentifier::from_principal(&p, None);
        let b = AccountIdentifier::from_principal(&p, None);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_subaccount_means_default() {
        let p = principal(1);
        let implicit = AccountIdentifier::from_principal(&p, None);
        let explicit = AccountIdentifier::from_principal(&p, Some(&Subaccount::default()));
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn distinct_inputs_give_distinct_addresses() {
        let a = AccountIdentifier::from_principal(&principal(1), None);
        let b = AccountIdentifier::from_principal(&principal(2), None);
        assert_ne!(a, b);

        let sub = Subaccount([7u8; 32]);
        let c = AccountIdentifier::from_principal(&principal(1), Some(&sub));
        assert_ne!(a, c);
    }

    #[test]
    fn hex_roundtrip() {
        let a = AccountIdentifier::from_principal(&principal(3), None);
        let hex = a.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(hex, hex.to_lowercase());
        assert_eq!(AccountIdentifier::from_hex(&hex).unwrap(), a);
    }

    #[test]
    fn principal_text_roundtrip() {
        let p = principal(4);
        let parsed = Principal::from_text(&p.to_text()).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn parse_user_input_accepts_hex_both_cases() {
        let a = AccountIdentifier::from_principal(&principal(5), None);
        let hex = a.to_hex();
        assert_eq!(parse_user_input(&hex), Some(a));
        assert_eq!(parse_user_input(&hex.to_uppercase()), Some(a));
    }

    #[test]
    fn parse_user_input_accepts_principal_text() {
        let p = principal(6);
        let expected = AccountIdentifier::from_principal(&p, None);
        assert_eq!(parse_user_input(&p.to_text()), Some(expected));
    }

    #[test]
    fn parse_user_input_roundtrips_derived_address() {
        let p = principal(7);
        let derived = AccountIdentifier::from_principal(&p, None);
        assert_eq!(parse_user_input(&derived.to_hex()), Some(derived));
    }

    #[test]
    fn parse_user_input_rejects_garbage() {
        assert_eq!(parse_user_input(""), None);
        assert_eq!(parse_user_input("not an address!!!"), None);
        // 63 hex chars: not an address, and too long to be a principal
        let sixty_three = "ab".repeat(32)[..63].to_string();
        assert_eq!(parse_user_input(&sixty_three), None);
        // 64 chars with a non-hex character
        let mut bad = "a".repeat(64);
        bad.replace_range(10..11, "g");
        assert_eq!(parse_user_input(&bad), None);
    }

    #[test]
    fn principal_length_limits() {
        assert!(Principal::from_slice(&[]).is_err());
        assert!(Principal::from_slice(&[0u8; 30]).is_err());
        assert!(Principal::from_slice(&[0u8; 29]).is_ok());
    }
}
