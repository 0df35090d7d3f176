//! The closed set of signer kinds an account accepts.

mod secp256k1;
pub(crate) mod secp256r1;
mod starknet;

pub use secp256k1::{Secp256k1Signer, ethereum_address};
pub use secp256r1::{Secp256r1Signer, x_coordinate};
pub use starknet::StarknetSigner;

pub(crate) use self::secp256k1::verify as verify_secp256k1;
pub(crate) use self::starknet::verify as verify_starknet;

use crate::webauthn::WebauthnSigner;
use crate::{SignerError, SignerIdentity, SignerSignature};
use starknet_types_core::felt::Felt;
use tracing::debug;

/// Any signer the account can hold.
#[derive(Debug, Clone)]
pub enum Signer {
    /// Stark-curve key.
    Starknet(StarknetSigner),
    /// secp256k1 key.
    Secp256k1(Secp256k1Signer),
    /// secp256r1 key.
    Secp256r1(Secp256r1Signer),
    /// WebAuthn credential.
    Webauthn(WebauthnSigner),
}

impl Signer {
    /// Public identity.
    pub fn identity(&self) -> SignerIdentity {
        match self {
            Signer::Starknet(signer) => signer.identity(),
            Signer::Secp256k1(signer) => signer.identity(),
            Signer::Secp256r1(signer) => signer.identity(),
            Signer::Webauthn(signer) => signer.identity(),
        }
    }

    /// On-chain GUID.
    pub fn guid(&self) -> Felt {
        self.identity().guid()
    }

    /// The identity in calldata form.
    pub fn to_calldata(&self) -> Vec<Felt> {
        self.identity().to_felts()
    }

    /// Sign an arbitrary message hash.
    ///
    /// # Errors
    ///
    /// Whatever the underlying key or credential reports.
    pub async fn sign_raw(&self, message_hash: Felt) -> Result<SignerSignature, SignerError> {
        let signature = match self {
            Signer::Starknet(signer) => signer.sign_raw(message_hash)?,
            Signer::Secp256k1(signer) => signer.sign_raw(message_hash)?,
            Signer::Secp256r1(signer) => signer.sign_raw(message_hash)?,
            Signer::Webauthn(signer) => signer.sign_raw(message_hash).await?,
        };
        debug!(
            guid = %format!("{:#x}", signature.guid()),
            message_hash = %format!("{message_hash:#x}"),
            "signed message hash"
        );
        Ok(signature)
    }
}

impl From<StarknetSigner> for Signer {
    fn from(signer: StarknetSigner) -> Self {
        Signer::Starknet(signer)
    }
}

impl From<Secp256k1Signer> for Signer {
    fn from(signer: Secp256k1Signer) -> Self {
        Signer::Secp256k1(signer)
    }
}

impl From<Secp256r1Signer> for Signer {
    fn from(signer: Secp256r1Signer) -> Self {
        Signer::Secp256r1(signer)
    }
}

impl From<WebauthnSigner> for Signer {
    fn from(signer: WebauthnSigner) -> Self {
        Signer::Webauthn(signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_signs_verifiably_with_every_key_kind() {
        let signers: Vec<Signer> = vec![
            StarknetSigner::random().into(),
            Secp256k1Signer::random().into(),
            Secp256r1Signer::random().into(),
        ];
        let hash = Felt::from(0x5eedu64);
        for signer in signers {
            let signature = signer.sign_raw(hash).await.unwrap();
            assert_eq!(signature.identity(), signer.identity());
            assert!(signature.verify(hash));
            assert!(!signature.verify(hash + Felt::ONE));
        }
    }

    #[test]
    fn it_exposes_identity_calldata() {
        let signer: Signer = StarknetSigner::from_private_key(Felt::TWO).unwrap().into();
        let calldata = signer.to_calldata();
        assert_eq!(calldata[0], Felt::ZERO);
        assert_eq!(calldata.len(), 2);
    }
}
