//! Signer identities and their on-chain GUIDs.
//!
//! The account stores signers by GUID, a Poseidon hash over a kind tag and
//! the signer's public material. The GUID is also the multisig sort key.

use crate::Uint256;
use aegis_typed_data::{byte_span, short_string_literal};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use starknet_crypto::{poseidon_hash, poseidon_hash_many};
use starknet_types_core::felt::Felt;

/// Position of each signer kind in the account's `Signer` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SignerType {
    /// Stark-curve key.
    Starknet = 0,
    /// secp256k1 key identified by its Ethereum address.
    Secp256k1 = 1,
    /// secp256r1 key identified by its x-coordinate.
    Secp256r1 = 2,
    /// Reserved by the account; never produced here.
    Eip191 = 3,
    /// WebAuthn credential.
    Webauthn = 4,
}

impl SignerType {
    /// Variant index as it appears in calldata.
    pub fn to_felt(self) -> Felt {
        Felt::from(self as u8)
    }
}

/// Public material of a WebAuthn credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebauthnIdentity {
    /// Origin the credential is used from, e.g. `https://example.com`.
    pub origin: String,
    /// SHA-256 of the relying party id.
    pub rp_id_hash: Uint256,
    /// x-coordinate of the P-256 public key.
    pub pubkey: Uint256,
}

impl WebauthnIdentity {
    /// Identity for a credential registered under `rp_id`.
    pub fn new(origin: impl Into<String>, rp_id: &str, pubkey: Uint256) -> Self {
        Self {
            origin: origin.into(),
            rp_id_hash: rp_id_hash(rp_id),
            pubkey,
        }
    }

    fn fields(&self) -> Vec<Felt> {
        let mut felts = byte_span(self.origin.as_bytes());
        felts.extend(self.rp_id_hash.to_felts());
        felts.extend(self.pubkey.to_felts());
        felts
    }
}

/// SHA-256 of a relying party id, as found at the start of authenticator data.
pub fn rp_id_hash(rp_id: &str) -> Uint256 {
    Uint256::from_be_bytes(Sha256::digest(rp_id.as_bytes()).into())
}

/// The public identity of a signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignerIdentity {
    /// Stark-curve public key.
    Starknet {
        /// Public key.
        pubkey: Felt,
    },
    /// Ethereum address of a secp256k1 key.
    Secp256k1 {
        /// Address in the low 160 bits.
        pubkey_hash: Felt,
    },
    /// x-coordinate of a secp256r1 key.
    Secp256r1 {
        /// x-coordinate.
        pubkey: Uint256,
    },
    /// WebAuthn credential.
    Webauthn(WebauthnIdentity),
}

impl SignerIdentity {
    /// Kind of this signer.
    pub fn signer_type(&self) -> SignerType {
        match self {
            SignerIdentity::Starknet { .. } => SignerType::Starknet,
            SignerIdentity::Secp256k1 { .. } => SignerType::Secp256k1,
            SignerIdentity::Secp256r1 { .. } => SignerType::Secp256r1,
            SignerIdentity::Webauthn(_) => SignerType::Webauthn,
        }
    }

    /// On-chain GUID.
    pub fn guid(&self) -> Felt {
        match self {
            SignerIdentity::Starknet { pubkey } => {
                poseidon_hash(short_string_literal(b"Starknet Signer"), *pubkey)
            }
            SignerIdentity::Secp256k1 { pubkey_hash } => {
                poseidon_hash(short_string_literal(b"Secp256k1 Signer"), *pubkey_hash)
            }
            SignerIdentity::Secp256r1 { pubkey } => {
                let [low, high] = pubkey.to_felts();
                poseidon_hash_many(&[short_string_literal(b"Secp256r1 Signer"), low, high])
            }
            SignerIdentity::Webauthn(identity) => {
                let mut elements = vec![short_string_literal(b"Webauthn Signer")];
                elements.extend(identity.fields());
                poseidon_hash_many(&elements)
            }
        }
    }

    /// Identity fields without the variant index.
    pub(crate) fn fields(&self) -> Vec<Felt> {
        match self {
            SignerIdentity::Starknet { pubkey } => vec![*pubkey],
            SignerIdentity::Secp256k1 { pubkey_hash } => vec![*pubkey_hash],
            SignerIdentity::Secp256r1 { pubkey } => pubkey.to_felts().to_vec(),
            SignerIdentity::Webauthn(identity) => identity.fields(),
        }
    }

    /// Calldata form: `[variant, fields...]`.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = vec![self.signer_type().to_felt()];
        felts.extend(self.fields());
        felts
    }
}
