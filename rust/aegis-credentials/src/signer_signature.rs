//! Signatures in the account's `SignerSignature` calldata shape.

use crate::normalize::RawSignature;
use crate::signer::{secp256r1, verify_secp256k1, verify_starknet};
use crate::webauthn::WebAuthnSignatureRecord;
use crate::{SignerIdentity, Uint256, WebauthnIdentity};
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// A signature together with the identity of the signer that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignerSignature {
    /// Stark-curve ECDSA.
    Starknet {
        /// Signer public key.
        pubkey: Felt,
        /// `r` component.
        r: Felt,
        /// `s` component.
        s: Felt,
    },
    /// secp256k1 ECDSA.
    Secp256k1 {
        /// Signer Ethereum address.
        pubkey_hash: Felt,
        /// Low-S signature.
        signature: RawSignature,
    },
    /// secp256r1 ECDSA.
    Secp256r1 {
        /// Signer x-coordinate.
        pubkey: Uint256,
        /// Low-S signature.
        signature: RawSignature,
    },
    /// WebAuthn assertion.
    Webauthn {
        /// Credential identity.
        identity: WebauthnIdentity,
        /// Decoded assertion.
        record: WebAuthnSignatureRecord,
    },
}

impl SignerSignature {
    /// Identity of the signer.
    pub fn identity(&self) -> SignerIdentity {
        match self {
            SignerSignature::Starknet { pubkey, .. } => SignerIdentity::Starknet { pubkey: *pubkey },
            SignerSignature::Secp256k1 { pubkey_hash, .. } => SignerIdentity::Secp256k1 {
                pubkey_hash: *pubkey_hash,
            },
            SignerSignature::Secp256r1 { pubkey, .. } => SignerIdentity::Secp256r1 { pubkey: *pubkey },
            SignerSignature::Webauthn { identity, .. } => SignerIdentity::Webauthn(identity.clone()),
        }
    }

    /// GUID of the signer.
    pub fn guid(&self) -> Felt {
        self.identity().guid()
    }

    /// Calldata: the identity's `[variant, fields...]` followed by the
    /// signature fields.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = self.identity().to_felts();
        match self {
            SignerSignature::Starknet { r, s, .. } => felts.extend([*r, *s]),
            SignerSignature::Secp256k1 { signature, .. }
            | SignerSignature::Secp256r1 { signature, .. } => felts.extend(signature.to_felts()),
            SignerSignature::Webauthn { record, .. } => felts.extend(record.to_felts()),
        }
        felts
    }

    /// Check the signature against `message_hash` the way the account does.
    pub fn verify(&self, message_hash: Felt) -> bool {
        match self {
            SignerSignature::Starknet { pubkey, r, s } => {
                verify_starknet(pubkey, &message_hash, r, s)
            }
            SignerSignature::Secp256k1 {
                pubkey_hash,
                signature,
            } => verify_secp256k1(pubkey_hash, &message_hash, signature),
            SignerSignature::Secp256r1 { pubkey, signature } => {
                secp256r1::verify(*pubkey, &message_hash.to_bytes_be(), signature)
            }
            SignerSignature::Webauthn { identity, record } => record.verify(identity, message_hash),
        }
    }
}
