//! Cairo `u256`.

use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;
use std::fmt;

/// A 256-bit unsigned integer split into two 128-bit limbs, as Cairo stores it.
///
/// Calldata order is `[low, high]`. Ordering is numeric.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Uint256 {
    // Declared high-first so the derived ordering is numeric.
    high: u128,
    low: u128,
}

impl Uint256 {
    /// Zero.
    pub const ZERO: Self = Self::from_words(0, 0);

    /// Build from the two limbs.
    pub const fn from_words(low: u128, high: u128) -> Self {
        Self { high, low }
    }

    /// Low 128 bits.
    pub const fn low(&self) -> u128 {
        self.low
    }

    /// High 128 bits.
    pub const fn high(&self) -> u128 {
        self.high
    }

    /// Interpret 32 big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut high = [0u8; 16];
        let mut low = [0u8; 16];
        high.copy_from_slice(&bytes[..16]);
        low.copy_from_slice(&bytes[16..]);
        Self::from_words(u128::from_be_bytes(low), u128::from_be_bytes(high))
    }

    /// Interpret up to 32 big-endian bytes, left-padding with zeros.
    ///
    /// Returns `None` for longer input.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 32 {
            return None;
        }
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(bytes);
        Some(Self::from_be_bytes(padded))
    }

    /// 32 big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&self.high.to_be_bytes());
        bytes[16..].copy_from_slice(&self.low.to_be_bytes());
        bytes
    }

    /// Calldata serialization.
    pub fn to_felts(&self) -> [Felt; 2] {
        [Felt::from(self.low), Felt::from(self.high)]
    }
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        Self::from_words(value, 0)
    }
}

impl fmt::LowerHex for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        if self.high == 0 {
            write!(f, "{:x}", self.low)
        } else {
            write!(f, "{:x}{:032x}", self.high, self.low)
        }
    }
}
