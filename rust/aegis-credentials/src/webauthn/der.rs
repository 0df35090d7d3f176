//! DER `ECDSA-Sig-Value` extraction.

use crate::{Uint256, WebAuthnError};
use p256::ecdsa::DerSignature;

/// Decode `SEQUENCE { INTEGER r, INTEGER s }` into the two scalars.
///
/// # Errors
///
/// Fails on malformed ASN.1 (including negative or non-minimal integers) or
/// if a component is wider than 32 bytes once its sign padding is removed.
pub fn parse_der_signature(der: &[u8]) -> Result<(Uint256, Uint256), WebAuthnError> {
    let signature = DerSignature::from_bytes(der)
        .map_err(|e| WebAuthnError::InvalidSignatureEncoding(e.to_string()))?;
    Ok((
        integer(signature.r_bytes())?,
        integer(signature.s_bytes())?,
    ))
}

/// Drop the `0x00` DER prepends to keep a high-bit integer positive.
pub fn strip_integer_padding(bytes: &[u8]) -> &[u8] {
    match bytes {
        [0x00, next, ..] if next & 0x80 != 0 => &bytes[1..],
        _ => bytes,
    }
}

fn integer(bytes: &[u8]) -> Result<Uint256, WebAuthnError> {
    let stripped = strip_integer_padding(bytes);
    Uint256::from_be_slice(stripped).ok_or_else(|| {
        WebAuthnError::InvalidSignatureEncoding(format!("integer is {} bytes", stripped.len()))
    })
}
