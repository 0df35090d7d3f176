//! Low-S canonicalization of secp256k1 and secp256r1 signatures.

use crate::Uint256;
use aegis_typed_data::felt_from_bool;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// Curves whose signatures the account verifies through `u256` arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// The Ethereum curve.
    Secp256k1,
    /// NIST P-256, used by WebAuthn credentials.
    Secp256r1,
}

/// An ECDSA signature in the shape the account verifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawSignature {
    /// `r` component.
    pub r: Uint256,
    /// `s` component.
    pub s: Uint256,
    /// Parity of the `y` coordinate of the nonce point.
    pub y_parity: bool,
}

impl RawSignature {
    /// Whether `s` already lies in the lower half of the group order.
    ///
    /// A pair that is not a valid signature on `curve` is never canonical.
    pub fn is_canonical(&self, curve: Curve) -> bool {
        matches!(fold_high_s(curve, self.r, self.s), Ok(None))
    }

    /// `[r.low, r.high, s.low, s.high, y_parity]`.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = Vec::with_capacity(5);
        felts.extend(self.r.to_felts());
        felts.extend(self.s.to_felts());
        felts.push(felt_from_bool(self.y_parity));
        felts
    }
}

/// Move `s` into the lower half of the group order.
///
/// When `s > n/2` the signature is replaced by the equivalent `(r, n - s)`,
/// which was produced by the negated nonce point, so the recovery bit flips.
/// Canonical inputs pass through unchanged, which makes the operation
/// idempotent. A pair that is not a signature on `curve` (a zero component or
/// one at or above `n`) is returned as given.
pub fn normalize(curve: Curve, r: Uint256, s: Uint256, recovery_bit: bool) -> RawSignature {
    match fold_high_s(curve, r, s) {
        Ok(Some(folded)) => RawSignature {
            r,
            s: folded,
            y_parity: !recovery_bit,
        },
        Ok(None) | Err(_) => RawSignature {
            r,
            s,
            y_parity: recovery_bit,
        },
    }
}

/// `Some(n - s)` when `s` is high, `None` when it already is low.
fn fold_high_s(curve: Curve, r: Uint256, s: Uint256) -> Result<Option<Uint256>, ecdsa::Error> {
    let (r, s) = (r.to_be_bytes(), s.to_be_bytes());
    let folded = match curve {
        Curve::Secp256k1 => k256::ecdsa::Signature::from_scalars(r, s)?
            .normalize_s()
            .map(|low| low.split_bytes().1),
        Curve::Secp256r1 => p256::ecdsa::Signature::from_scalars(r, s)?
            .normalize_s()
            .map(|low| low.split_bytes().1),
    };
    Ok(folded.and_then(|bytes| Uint256::from_be_slice(&bytes)))
}
