use super::assertion::{AssertionRequest, CredentialProvider, UserVerification};
use super::codec::{challenge, decode_assertion};
use super::record::{Sha256Implementation, WebAuthnSignatureRecord};
use crate::signer::secp256r1::x_coordinate;
use crate::{SignerIdentity, SignerSignature, WebAuthnError, WebauthnIdentity};
use p256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Deployment settings shared by every credential of an application.
///
/// ```json
/// { "origin": "https://example.com", "rp_id": "example.com", "sha256_implementation": "cairo1" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebauthnConfig {
    /// Origin the browser reports in `clientDataJSON`.
    pub origin: String,
    /// Relying party id the credential is scoped to.
    pub rp_id: String,
    /// Digest implementation the account verifies with.
    #[serde(default)]
    pub sha256_implementation: Sha256Implementation,
}

/// A WebAuthn credential used as an account signer.
///
/// Signing goes through the injected [`CredentialProvider`]; the signer itself
/// only holds public material.
#[derive(Clone)]
pub struct WebauthnSigner {
    identity: WebauthnIdentity,
    rp_id: String,
    credential_id: Vec<u8>,
    sha256_implementation: Sha256Implementation,
    provider: Arc<dyn CredentialProvider>,
}

impl WebauthnSigner {
    /// Signer for a registered credential.
    ///
    /// `public_key_sec1` is the SEC1-encoded P-256 point (33 or 65 bytes).
    ///
    /// # Errors
    ///
    /// Fails if the public key is not a valid P-256 point.
    pub fn new(
        config: &WebauthnConfig,
        public_key_sec1: &[u8],
        credential_id: Vec<u8>,
        provider: Arc<dyn CredentialProvider>,
    ) -> Result<Self, WebAuthnError> {
        let key = VerifyingKey::from_sec1_bytes(public_key_sec1)
            .map_err(|e| WebAuthnError::InvalidPublicKey(e.to_string()))?;
        let pubkey = x_coordinate(&key)
            .ok_or_else(|| WebAuthnError::InvalidPublicKey("point at infinity".into()))?;
        Ok(Self {
            identity: WebauthnIdentity::new(config.origin.clone(), &config.rp_id, pubkey),
            rp_id: config.rp_id.clone(),
            credential_id,
            sha256_implementation: config.sha256_implementation,
            provider,
        })
    }

    /// Public identity.
    #[must_use]
    pub fn identity(&self) -> SignerIdentity {
        SignerIdentity::Webauthn(self.identity.clone())
    }

    /// Credential identity fields.
    #[must_use]
    pub const fn webauthn_identity(&self) -> &WebauthnIdentity {
        &self.identity
    }

    /// Relying party id.
    #[must_use]
    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    /// Raw credential id.
    #[must_use]
    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    /// Digest implementation bound into every challenge.
    #[must_use]
    pub const fn sha256_implementation(&self) -> Sha256Implementation {
        self.sha256_implementation
    }

    /// Request an assertion over `message_hash` and decode it.
    ///
    /// # Errors
    ///
    /// Platform failures are returned as [`WebAuthnError::Credential`];
    /// anything else comes from [`decode_assertion`].
    pub async fn sign(&self, message_hash: Felt) -> Result<WebAuthnSignatureRecord, WebAuthnError> {
        let request = AssertionRequest {
            challenge: challenge(message_hash, self.sha256_implementation),
            rp_id: self.rp_id.clone(),
            allow_credentials: vec![self.credential_id.clone()],
            user_verification: UserVerification::Required,
        };
        debug!(rp_id = %self.rp_id, "requesting webauthn assertion");
        let assertion = self
            .provider
            .get_assertion(request)
            .await
            .inspect_err(|error| warn!(%error, "credential request refused"))?;
        decode_assertion(
            &self.identity,
            message_hash,
            self.sha256_implementation,
            &assertion,
        )
    }

    /// Signature in the account's calldata shape.
    ///
    /// # Errors
    ///
    /// See [`WebauthnSigner::sign`].
    pub async fn sign_raw(&self, message_hash: Felt) -> Result<SignerSignature, WebAuthnError> {
        Ok(SignerSignature::Webauthn {
            identity: self.identity.clone(),
            record: self.sign(message_hash).await?,
        })
    }
}

impl fmt::Debug for WebauthnSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebauthnSigner")
            .field("identity", &self.identity)
            .field("rp_id", &self.rp_id)
            .field("sha256_implementation", &self.sha256_implementation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CredentialError;
    use crate::webauthn::{SoftwareAuthenticator, WebAuthnAssertion};
    use async_trait::async_trait;

    struct Refusing(CredentialError);

    #[async_trait]
    impl CredentialProvider for Refusing {
        async fn get_assertion(
            &self,
            _request: AssertionRequest,
        ) -> Result<WebAuthnAssertion, CredentialError> {
            Err(self.0.clone())
        }
    }

    fn config() -> WebauthnConfig {
        WebauthnConfig {
            origin: "https://example.com".into(),
            rp_id: "example.com".into(),
            sha256_implementation: Sha256Implementation::Cairo1,
        }
    }

    #[test]
    fn it_loads_config_with_a_default_implementation() {
        let config: WebauthnConfig =
            serde_json::from_str(r#"{"origin":"https://example.com","rp_id":"example.com"}"#)
                .unwrap();
        assert_eq!(config.sha256_implementation, Sha256Implementation::Cairo1);
    }

    #[tokio::test]
    async fn it_surfaces_platform_refusals() {
        let authenticator = SoftwareAuthenticator::new(&config());
        for error in [
            CredentialError::UserCancelled,
            CredentialError::NoCredential,
            CredentialError::Platform("NotAllowedError".into()),
        ] {
            let signer = WebauthnSigner::new(
                &config(),
                &authenticator.public_key_sec1(),
                authenticator.credential_id().to_vec(),
                Arc::new(Refusing(error.clone())),
            )
            .unwrap();
            assert_eq!(
                signer.sign(Felt::ONE).await,
                Err(WebAuthnError::Credential(error))
            );
        }
    }

    #[tokio::test]
    async fn it_signs_through_the_software_authenticator() {
        let authenticator = Arc::new(SoftwareAuthenticator::new(&config()));
        let signer = WebauthnSigner::new(
            &config(),
            &authenticator.public_key_sec1(),
            authenticator.credential_id().to_vec(),
            authenticator.clone(),
        )
        .unwrap();
        let hash = Felt::from(0xc0ffeeu64);
        let record = signer.sign(hash).await.unwrap();
        assert_eq!(record.sign_count, 1);
        assert!(record.verify(signer.webauthn_identity(), hash));
        assert!(!record.verify(signer.webauthn_identity(), hash + Felt::ONE));
    }

    #[test]
    fn it_rejects_invalid_public_keys() {
        let authenticator = Arc::new(SoftwareAuthenticator::new(&config()));
        assert!(matches!(
            WebauthnSigner::new(&config(), &[0x04, 0x01], vec![], authenticator),
            Err(WebAuthnError::InvalidPublicKey(_))
        ));
    }
}
