use crate::normalize::{Curve, RawSignature, normalize};
use crate::{SignerError, SignerIdentity, SignerSignature, Uint256};
use ecdsa::RecoveryId;
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use starknet_types_core::felt::Felt;
use std::fmt;

/// A secp256r1 key, identified on chain by its x-coordinate.
#[derive(Clone)]
pub struct Secp256r1Signer {
    key: SigningKey,
    pubkey: Uint256,
}

impl Secp256r1Signer {
    /// Signer for a 32-byte secret scalar.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not a valid scalar.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, SignerError> {
        let key =
            SigningKey::from_slice(secret).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Self::from_signing_key(key)
    }

    /// Fresh key from the operating system's RNG.
    pub fn random() -> Self {
        loop {
            if let Ok(signer) =
                Self::from_signing_key(SigningKey::random(&mut rand::rngs::OsRng))
            {
                return signer;
            }
        }
    }

    fn from_signing_key(key: SigningKey) -> Result<Self, SignerError> {
        let pubkey = x_coordinate(key.verifying_key())
            .ok_or_else(|| SignerError::InvalidKey("public key at infinity".into()))?;
        Ok(Self { key, pubkey })
    }

    /// x-coordinate of the public key.
    #[must_use]
    pub const fn pubkey(&self) -> Uint256 {
        self.pubkey
    }

    /// Public identity.
    #[must_use]
    pub fn identity(&self) -> SignerIdentity {
        SignerIdentity::Secp256r1 {
            pubkey: self.pubkey,
        }
    }

    /// Low-S signature over the 32-byte big-endian `message_hash`.
    ///
    /// # Errors
    ///
    /// Fails if the ECDSA primitive does or no parity recovers the key.
    pub fn sign(&self, message_hash: Felt) -> Result<RawSignature, SignerError> {
        let prehash = message_hash.to_bytes_be();
        let signature: Signature = self
            .key
            .sign_prehash(&prehash)
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        let (r, s) = split(&signature);
        let y_parity = recover_parity(self.pubkey, &prehash, &signature)
            .ok_or_else(|| SignerError::Signing("parity recovery failed".into()))?;
        Ok(normalize(Curve::Secp256r1, r, s, y_parity))
    }

    /// Signature in the account's calldata shape.
    ///
    /// # Errors
    ///
    /// See [`Secp256r1Signer::sign`].
    pub fn sign_raw(&self, message_hash: Felt) -> Result<SignerSignature, SignerError> {
        Ok(SignerSignature::Secp256r1 {
            pubkey: self.pubkey,
            signature: self.sign(message_hash)?,
        })
    }
}

impl fmt::Debug for Secp256r1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256r1Signer")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}

pub(crate) fn split(signature: &Signature) -> (Uint256, Uint256) {
    let (r, s) = signature.split_bytes();
    let mut r_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&r);
    s_bytes.copy_from_slice(&s);
    (Uint256::from_be_bytes(r_bytes), Uint256::from_be_bytes(s_bytes))
}

/// x-coordinate of a P-256 public key.
pub fn x_coordinate(key: &VerifyingKey) -> Option<Uint256> {
    let point = key.to_encoded_point(false);
    point.x().and_then(|x| Uint256::from_be_slice(x))
}

/// Build a P-256 signature from its scalars.
pub(crate) fn signature_from_scalars(r: Uint256, s: Uint256) -> Option<Signature> {
    Signature::from_scalars(r.to_be_bytes(), s.to_be_bytes()).ok()
}

/// x-coordinate of the key recovered with the given parity.
pub(crate) fn recover_x(prehash: &[u8], signature: &Signature, y_parity: bool) -> Option<Uint256> {
    VerifyingKey::recover_from_prehash(prehash, signature, RecoveryId::new(y_parity, false))
        .ok()
        .and_then(|key| x_coordinate(&key))
}

/// Parity under which `signature` recovers a key with x-coordinate `pubkey`.
///
/// Tries even first, then odd.
pub(crate) fn recover_parity(pubkey: Uint256, prehash: &[u8], signature: &Signature) -> Option<bool> {
    [false, true]
        .into_iter()
        .find(|parity| recover_x(prehash, signature, *parity) == Some(pubkey))
}

/// Check a signature the way the account does: recover the key with the
/// given parity and compare x-coordinates.
pub(crate) fn verify(pubkey: Uint256, prehash: &[u8], signature: &RawSignature) -> bool {
    signature_from_scalars(signature.r, signature.s)
        .and_then(|ecdsa| recover_x(prehash, &ecdsa, signature.y_parity))
        == Some(pubkey)
}
