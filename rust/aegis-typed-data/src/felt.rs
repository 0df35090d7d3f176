//! Field element helpers.
//!
//! Starknet encodes short strings as the big-endian integer of their ASCII
//! bytes, entry point selectors as a 250-bit Keccak digest, and `Span<u8>`
//! arguments as a length followed by one felt per byte. These helpers keep
//! those encodings in one place.

use crate::error::TypedDataError;
use serde::{Deserialize, Deserializer};
use sha3::{Digest, Keccak256};
use starknet_types_core::felt::Felt;

/// Longest string that fits into a single field element.
pub const MAX_SHORT_STRING_LEN: usize = 31;

/// Entry point names that the protocol maps to the zero selector.
const DEFAULT_ENTRY_POINTS: [&str; 2] = ["__default__", "__l1_default__"];

/// Encode a Cairo short string.
///
/// # Errors
///
/// Fails if `value` is not ASCII or is longer than 31 bytes.
pub fn short_string(value: &str) -> Result<Felt, TypedDataError> {
    if !value.is_ascii() {
        return Err(TypedDataError::NonAsciiShortString(value.to_owned()));
    }
    if value.len() > MAX_SHORT_STRING_LEN {
        return Err(TypedDataError::ShortStringTooLong(value.to_owned()));
    }
    Ok(Felt::from_bytes_be_slice(value.as_bytes()))
}

/// Encode a short string literal known to fit into a felt.
///
/// Intended for protocol constants such as `"Starknet Signer"`.
pub fn short_string_literal(value: &'static [u8]) -> Felt {
    debug_assert!(value.len() <= MAX_SHORT_STRING_LEN && value.is_ascii());
    Felt::from_bytes_be_slice(value)
}

/// Parse a felt literal the way typed data values are interpreted:
/// `0x`-prefixed hex, then a plain decimal number, then a short string.
///
/// # Errors
///
/// Fails if the value looks numeric but is out of range, or if it falls
/// back to a short string that cannot be encoded.
pub fn parse_felt(value: &str) -> Result<Felt, TypedDataError> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypedDataError::InvalidFelt(value.to_owned()));
        }
        return Felt::from_hex(value).map_err(|_| TypedDataError::InvalidFelt(value.to_owned()));
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return Felt::from_dec_str(value).map_err(|_| TypedDataError::InvalidFelt(value.to_owned()));
    }
    short_string(value)
}

/// `serde` helper accepting any literal understood by [`parse_felt`].
///
/// # Errors
///
/// Returns the deserializer's error if the value is not a string or cannot
/// be parsed.
pub fn deserialize_felt_literal<'de, D>(deserializer: D) -> Result<Felt, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_felt(&value).map_err(serde::de::Error::custom)
}

/// Keccak-256 truncated to the 250 low bits.
pub fn starknet_keccak(data: &[u8]) -> Felt {
    let mut digest: [u8; 32] = Keccak256::digest(data).into();
    digest[0] &= 0x03;
    Felt::from_bytes_be(&digest)
}

/// Entry point selector for a function name.
pub fn selector(name: &str) -> Felt {
    if DEFAULT_ENTRY_POINTS.contains(&name) {
        Felt::ZERO
    } else {
        starknet_keccak(name.as_bytes())
    }
}

/// Serialize bytes as a Cairo `Span<u8>`: the length, then one felt per byte.
pub fn byte_span(bytes: &[u8]) -> Vec<Felt> {
    let mut felts = Vec::with_capacity(bytes.len() + 1);
    felts.push(felt_from_len(bytes.len()));
    felts.extend(bytes.iter().map(|byte| Felt::from(*byte)));
    felts
}

/// Felt holding a collection length.
pub fn felt_from_len(len: usize) -> Felt {
    Felt::from(len as u64)
}

/// Felt holding a boolean, as Cairo serializes `bool`.
pub fn felt_from_bool(value: bool) -> Felt {
    if value { Felt::ONE } else { Felt::ZERO }
}
