use super::codec::{challenge, client_data_prefix, signed_digest};
use crate::normalize::RawSignature;
use crate::signer::secp256r1;
use crate::WebauthnIdentity;
use aegis_typed_data::byte_span;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// SHA-256 implementation the account uses to rebuild the digest.
///
/// The choice is fixed per deployment and is bound into the challenge so an
/// assertion cannot be replayed against the other variant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Sha256Implementation {
    /// Cairo 0 library implementation.
    Cairo0 = 0,
    /// Cairo 1 builtin-backed implementation.
    #[default]
    Cairo1 = 1,
}

impl Sha256Implementation {
    /// Variant index.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// The compact form of an assertion the account verifies.
///
/// Fields the account can rebuild itself (the challenge, origin and rpIdHash)
/// are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAuthnSignatureRecord {
    /// Everything in `clientDataJSON` after the `origin` member, closing brace
    /// included. Empty when the origin member is immediately followed by `}`.
    pub client_data_json_outro: Vec<u8>,
    /// Authenticator flags byte.
    pub flags: u8,
    /// Authenticator signature counter.
    pub sign_count: u32,
    /// Low-S signature with recovered parity.
    pub ec_signature: RawSignature,
    /// Digest implementation bound into the challenge.
    pub sha256_implementation: Sha256Implementation,
}

impl WebAuthnSignatureRecord {
    /// Calldata: `[outro span..., flags, sign_count, r, s, y_parity, sha256_implementation]`.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = byte_span(&self.client_data_json_outro);
        felts.push(Felt::from(self.flags));
        felts.push(Felt::from(self.sign_count));
        felts.extend(self.ec_signature.to_felts());
        felts.push(Felt::from(self.sha256_implementation.index()));
        felts
    }

    /// Rebuild `clientDataJSON` for `message_hash`.
    pub fn client_data_json(&self, identity: &WebauthnIdentity, message_hash: Felt) -> Vec<u8> {
        let challenge = challenge(message_hash, self.sha256_implementation);
        let mut json = client_data_prefix(&challenge, &identity.origin).into_bytes();
        if self.client_data_json_outro.is_empty() {
            json.push(b'}');
        } else {
            json.extend_from_slice(&self.client_data_json_outro);
        }
        json
    }

    /// Rebuild authenticator data: rpIdHash, flags, big-endian counter.
    pub fn authenticator_data(&self, identity: &WebauthnIdentity) -> Vec<u8> {
        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&identity.rp_id_hash.to_be_bytes());
        data.push(self.flags);
        data.extend_from_slice(&self.sign_count.to_be_bytes());
        data
    }

    /// Verify the record as the account does: rebuild both structures,
    /// recompute the digest and recover the key with the stored parity.
    pub fn verify(&self, identity: &WebauthnIdentity, message_hash: Felt) -> bool {
        let digest = signed_digest(
            &self.authenticator_data(identity),
            &self.client_data_json(identity, message_hash),
        );
        secp256r1::verify(identity.pubkey, &digest, &self.ec_signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Uint256;

    fn record(outro: &[u8]) -> WebAuthnSignatureRecord {
        WebAuthnSignatureRecord {
            client_data_json_outro: outro.to_vec(),
            flags: 0x05,
            sign_count: 0x0102,
            ec_signature: RawSignature {
                r: Uint256::from(1u128),
                s: Uint256::from(2u128),
                y_parity: true,
            },
            sha256_implementation: Sha256Implementation::Cairo0,
        }
    }

    #[test]
    fn it_lays_out_calldata() {
        let felts = record(b",}").to_felts();
        let expected: Vec<Felt> = [2u64, b',' as u64, b'}' as u64, 5, 0x0102, 1, 0, 2, 0, 1, 0]
            .into_iter()
            .map(Felt::from)
            .collect();
        assert_eq!(felts, expected);
    }

    #[test]
    fn it_closes_an_empty_outro_with_a_brace() {
        let identity = WebauthnIdentity::new("https://example.com", "example.com", Uint256::ZERO);
        let json = record(b"").client_data_json(&identity, Felt::ONE);
        assert_eq!(json.last(), Some(&b'}'));
        assert!(json.starts_with(br#"{"type":"webauthn.get","challenge":""#));
        assert!(json.ends_with(br#""origin":"https://example.com"}"#));
    }

    #[test]
    fn it_rebuilds_37_bytes_of_authenticator_data() {
        let identity = WebauthnIdentity::new("https://example.com", "example.com", Uint256::ZERO);
        let data = record(b"").authenticator_data(&identity);
        assert_eq!(data.len(), 37);
        assert_eq!(data[32], 0x05);
        assert_eq!(&data[33..], &[0u8, 0, 1, 2]);
    }
}
