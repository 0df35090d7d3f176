use crate::normalize::{Curve, RawSignature, normalize};
use crate::{SignerError, SignerIdentity, SignerSignature, Uint256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use starknet_types_core::felt::Felt;
use std::fmt;

/// A secp256k1 key, identified on chain by its Ethereum address.
#[derive(Clone)]
pub struct Secp256k1Signer {
    key: SigningKey,
    pubkey_hash: Felt,
}

impl Secp256k1Signer {
    /// Signer for a 32-byte secret scalar.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not a valid scalar.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, SignerError> {
        let key =
            SigningKey::from_slice(secret).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self::from_signing_key(key))
    }

    /// Fresh key from the operating system's RNG.
    pub fn random() -> Self {
        Self::from_signing_key(SigningKey::random(&mut rand::rngs::OsRng))
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let pubkey_hash = ethereum_address(key.verifying_key());
        Self { key, pubkey_hash }
    }

    /// Ethereum address of the key.
    #[must_use]
    pub const fn pubkey_hash(&self) -> Felt {
        self.pubkey_hash
    }

    /// Public identity.
    #[must_use]
    pub fn identity(&self) -> SignerIdentity {
        SignerIdentity::Secp256k1 {
            pubkey_hash: self.pubkey_hash,
        }
    }

    /// Low-S signature over the 32-byte big-endian `message_hash`.
    ///
    /// # Errors
    ///
    /// Fails if the ECDSA primitive does.
    pub fn sign(&self, message_hash: Felt) -> Result<RawSignature, SignerError> {
        let prehash = message_hash.to_bytes_be();
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&prehash)
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        let (r, s) = split(&signature);
        Ok(normalize(Curve::Secp256k1, r, s, recovery_id.is_y_odd()))
    }

    /// Signature in the account's calldata shape.
    ///
    /// # Errors
    ///
    /// See [`Secp256k1Signer::sign`].
    pub fn sign_raw(&self, message_hash: Felt) -> Result<SignerSignature, SignerError> {
        Ok(SignerSignature::Secp256k1 {
            pubkey_hash: self.pubkey_hash,
            signature: self.sign(message_hash)?,
        })
    }
}

impl fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Signer")
            .field("pubkey_hash", &self.pubkey_hash)
            .finish_non_exhaustive()
    }
}

fn split(signature: &Signature) -> (Uint256, Uint256) {
    let (r, s) = signature.split_bytes();
    let mut r_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&r);
    s_bytes.copy_from_slice(&s);
    (Uint256::from_be_bytes(r_bytes), Uint256::from_be_bytes(s_bytes))
}

/// Last 20 bytes of the Keccak-256 of the uncompressed public key.
pub fn ethereum_address(key: &VerifyingKey) -> Felt {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    Felt::from_bytes_be_slice(&digest[12..])
}

/// Check a signature the way the account does: recover the key with the
/// given parity and compare addresses.
pub(crate) fn verify(pubkey_hash: &Felt, message_hash: &Felt, signature: &RawSignature) -> bool {
    let Ok(ecdsa) = Signature::from_scalars(signature.r.to_be_bytes(), signature.s.to_be_bytes())
    else {
        return false;
    };
    let recovery_id = RecoveryId::new(signature.y_parity, false);
    VerifyingKey::recover_from_prehash(&message_hash.to_bytes_be(), &ecdsa, recovery_id)
        .map(|key| ethereum_address(&key) == *pubkey_hash)
        .unwrap_or(false)
}
