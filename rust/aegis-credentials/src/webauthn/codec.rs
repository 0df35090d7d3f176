use super::assertion::WebAuthnAssertion;
use super::der::parse_der_signature;
use super::record::{Sha256Implementation, WebAuthnSignatureRecord};
use crate::normalize::{Curve, normalize};
use crate::signer::secp256r1;
use crate::{Uint256, WebAuthnError, WebauthnIdentity};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use starknet_types_core::felt::Felt;
use tracing::{debug, warn};

/// Authenticator data length without attested credential data or extensions.
const AUTHENTICATOR_DATA_LEN: usize = 37;

/// Challenge bytes: the hash big-endian, then the implementation index.
pub fn challenge(message_hash: Felt, implementation: Sha256Implementation) -> Vec<u8> {
    let mut challenge = Vec::with_capacity(33);
    challenge.extend_from_slice(&message_hash.to_bytes_be());
    challenge.push(implementation.index());
    challenge
}

/// The fixed head of `clientDataJSON`, up to and including the origin value.
pub fn client_data_prefix(challenge: &[u8], origin: &str) -> String {
    format!(
        r#"{{"type":"webauthn.get","challenge":"{}","origin":"{}""#,
        URL_SAFE_NO_PAD.encode(challenge),
        origin
    )
}

/// Split `clientDataJSON` into the expected prefix and the outro.
///
/// # Errors
///
/// Fails with [`WebAuthnError::InvalidClientData`] if the prefix differs
/// or the remainder is neither `}` nor `,...}`.
pub fn client_data_outro(
    client_data_json: &[u8],
    challenge: &[u8],
    origin: &str,
) -> Result<Vec<u8>, WebAuthnError> {
    let text = std::str::from_utf8(client_data_json)
        .map_err(|e| WebAuthnError::InvalidClientData(e.to_string()))?;
    let prefix = client_data_prefix(challenge, origin);
    let rest = text.strip_prefix(prefix.as_str()).ok_or_else(|| {
        WebAuthnError::InvalidClientData("type, challenge or origin mismatch".into())
    })?;
    if rest == "}" {
        Ok(Vec::new())
    } else if rest.starts_with(',') && rest.ends_with('}') {
        Ok(rest.as_bytes().to_vec())
    } else {
        Err(WebAuthnError::InvalidClientData(format!(
            "unexpected trailer {rest:?}"
        )))
    }
}

/// `SHA-256(authenticatorData || SHA-256(clientDataJSON))`.
pub fn signed_digest(authenticator_data: &[u8], client_data_json: &[u8]) -> [u8; 32] {
    let client_data_hash = Sha256::digest(client_data_json);
    let mut hasher = Sha256::new();
    hasher.update(authenticator_data);
    hasher.update(client_data_hash);
    hasher.finalize().into()
}

/// Read `(flags, sign_count)` from authenticator data bound to `rp_id_hash`.
///
/// # Errors
///
/// Fails with [`WebAuthnError::InvalidAuthenticatorData`] unless the data is
/// exactly 37 bytes and starts with `rp_id_hash`.
pub fn parse_authenticator_data(
    authenticator_data: &[u8],
    rp_id_hash: Uint256,
) -> Result<(u8, u32), WebAuthnError> {
    let data: &[u8; AUTHENTICATOR_DATA_LEN] = authenticator_data.try_into().map_err(|_| {
        WebAuthnError::InvalidAuthenticatorData(format!(
            "expected {AUTHENTICATOR_DATA_LEN} bytes, got {}",
            authenticator_data.len()
        ))
    })?;
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&data[..32]);
    if Uint256::from_be_bytes(hash) != rp_id_hash {
        return Err(WebAuthnError::InvalidAuthenticatorData(
            "rpIdHash mismatch".into(),
        ));
    }
    let flags = data[AUTHENTICATOR_DATA_LEN - 5];
    let sign_count = u32::from_be_bytes([data[33], data[34], data[35], data[36]]);
    Ok((flags, sign_count))
}

/// Turn an assertion over `message_hash` into the record the account verifies.
///
/// All structural checks run before any curve arithmetic.
///
/// # Errors
///
/// Any malformed part of the assertion, or a signature that recovers to a
/// different key under both parities.
pub fn decode_assertion(
    identity: &WebauthnIdentity,
    message_hash: Felt,
    sha256_implementation: Sha256Implementation,
    assertion: &WebAuthnAssertion,
) -> Result<WebAuthnSignatureRecord, WebAuthnError> {
    let challenge = challenge(message_hash, sha256_implementation);
    let client_data_json_outro =
        client_data_outro(&assertion.client_data_json, &challenge, &identity.origin)?;
    let (r, s) = parse_der_signature(&assertion.signature)?;
    let (flags, sign_count) =
        parse_authenticator_data(&assertion.authenticator_data, identity.rp_id_hash)?;

    let signature = secp256r1::signature_from_scalars(r, s).ok_or_else(|| {
        WebAuthnError::InvalidSignatureEncoding("scalar out of range".into())
    })?;
    let digest = signed_digest(&assertion.authenticator_data, &assertion.client_data_json);
    let Some(y_parity) = secp256r1::recover_parity(identity.pubkey, &digest, &signature) else {
        warn!(pubkey = %format!("{:#x}", identity.pubkey), "assertion does not recover credential key");
        return Err(WebAuthnError::ParityRecoveryFailed);
    };

    let ec_signature = normalize(Curve::Secp256r1, r, s, y_parity);
    debug!(
        message_hash = %format!("{message_hash:#x}"),
        sign_count,
        y_parity = ec_signature.y_parity,
        "decoded webauthn assertion"
    );
    Ok(WebAuthnSignatureRecord {
        client_data_json_outro,
        flags,
        sign_count,
        ec_signature,
        sha256_implementation,
    })
}
