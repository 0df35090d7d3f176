use crate::{SignerError, SignerIdentity, SignerSignature};
use rand::RngCore;
use starknet_crypto::{ExtendedSignature, SignError, get_public_key, rfc6979_generate_k, sign};
use starknet_types_core::felt::Felt;
use std::fmt;

/// A Stark-curve key signing with an RFC 6979 nonce.
#[derive(Clone)]
pub struct StarknetSigner {
    private_key: Felt,
    public_key: Felt,
}

impl StarknetSigner {
    /// Signer for an existing private key.
    ///
    /// # Errors
    ///
    /// Fails for the zero key.
    pub fn from_private_key(private_key: Felt) -> Result<Self, SignerError> {
        if private_key == Felt::ZERO {
            return Err(SignerError::InvalidKey("zero private key".into()));
        }
        Ok(Self {
            private_key,
            public_key: get_public_key(&private_key),
        })
    }

    /// Fresh key below 2^251, which keeps it under the curve order.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            bytes[0] &= 0x07;
            let private_key = Felt::from_bytes_be(&bytes);
            if let Ok(signer) = Self::from_private_key(private_key) {
                return signer;
            }
        }
    }

    /// Public key.
    #[must_use]
    pub const fn public_key(&self) -> Felt {
        self.public_key
    }

    /// Public identity.
    #[must_use]
    pub fn identity(&self) -> SignerIdentity {
        SignerIdentity::Starknet {
            pubkey: self.public_key,
        }
    }

    /// `(r, s)` over `message_hash`.
    ///
    /// # Errors
    ///
    /// Fails if the hash is outside the range the curve can sign.
    pub fn sign(&self, message_hash: Felt) -> Result<(Felt, Felt), SignerError> {
        let mut seed = None;
        loop {
            let k = rfc6979_generate_k(&message_hash, &self.private_key, seed.as_ref());
            match sign(&self.private_key, &message_hash, &k) {
                Ok(ExtendedSignature { r, s, .. }) => return Ok((r, s)),
                Err(SignError::InvalidK) => {
                    seed = Some(seed.unwrap_or(Felt::ZERO) + Felt::ONE);
                }
                Err(error) => return Err(SignerError::Signing(format!("{error:?}"))),
            }
        }
    }

    /// Signature in the account's calldata shape.
    ///
    /// # Errors
    ///
    /// See [`StarknetSigner::sign`].
    pub fn sign_raw(&self, message_hash: Felt) -> Result<SignerSignature, SignerError> {
        let (r, s) = self.sign(message_hash)?;
        Ok(SignerSignature::Starknet {
            pubkey: self.public_key,
            r,
            s,
        })
    }
}

impl fmt::Debug for StarknetSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarknetSigner")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Verify a Stark-curve signature.
pub(crate) fn verify(public_key: &Felt, message_hash: &Felt, r: &Felt, s: &Felt) -> bool {
    starknet_crypto::verify(public_key, message_hash, r, s).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_signs_deterministically() {
        let signer = StarknetSigner::from_private_key(Felt::from(0x1234u64)).unwrap();
        let hash = Felt::from(42u64);
        assert_eq!(signer.sign(hash).unwrap(), signer.sign(hash).unwrap());
    }

    #[test]
    fn it_produces_verifiable_signatures() {
        let signer = StarknetSigner::random();
        let hash = Felt::from_hex_unchecked("0x2a");
        let (r, s) = signer.sign(hash).unwrap();
        assert!(verify(&signer.public_key(), &hash, &r, &s));
        assert!(!verify(&signer.public_key(), &Felt::from(43u64), &r, &s));
    }

    #[test]
    fn it_rejects_the_zero_key() {
        assert!(matches!(
            StarknetSigner::from_private_key(Felt::ZERO),
            Err(SignerError::InvalidKey(_))
        ));
    }

    #[test]
    fn it_does_not_print_the_private_key() {
        let signer = StarknetSigner::from_private_key(Felt::from(0xdeadu64)).unwrap();
        let printed = format!("{signer:?}");
        assert!(!printed.contains("private_key"));
    }
}
