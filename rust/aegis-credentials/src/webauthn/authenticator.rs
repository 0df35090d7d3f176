//! A software stand-in for a platform authenticator.

use super::assertion::{AssertionRequest, CredentialProvider, WebAuthnAssertion};
use super::codec::{client_data_prefix, signed_digest};
use super::signer::WebauthnConfig;
use crate::signer::secp256r1::x_coordinate;
use crate::{CredentialError, SignerError, Uint256};
use async_trait::async_trait;
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU32, Ordering};

/// User present and user verified.
const FLAGS: u8 = 0x05;

/// A P-256 credential held in memory that answers assertion requests like a
/// platform authenticator: it scopes authenticator data to the requested
/// relying party, increments its signature counter and returns a DER
/// signature.
pub struct SoftwareAuthenticator {
    key: SigningKey,
    credential_id: Vec<u8>,
    origin: String,
    client_data_outro: String,
    sign_count: AtomicU32,
}

impl SoftwareAuthenticator {
    /// Fresh credential with a random key and credential id.
    pub fn new(config: &WebauthnConfig) -> Self {
        let mut credential_id = vec![0u8; 16];
        rand::thread_rng().fill_bytes(&mut credential_id);
        Self {
            key: SigningKey::random(&mut rand::rngs::OsRng),
            credential_id,
            origin: config.origin.clone(),
            client_data_outro: r#","crossOrigin":false}"#.into(),
            sign_count: AtomicU32::new(0),
        }
    }

    /// Credential for a fixed secret scalar.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not a valid scalar.
    pub fn from_bytes(config: &WebauthnConfig, secret: &[u8]) -> Result<Self, SignerError> {
        let key =
            SigningKey::from_slice(secret).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key,
            ..Self::new(config)
        })
    }

    /// Replace what follows the origin member in `clientDataJSON`.
    #[must_use]
    pub fn with_client_data_outro(mut self, outro: impl Into<String>) -> Self {
        self.client_data_outro = outro.into();
        self
    }

    /// Resume from a stored signature counter.
    #[must_use]
    pub fn with_sign_count(self, sign_count: u32) -> Self {
        self.sign_count.store(sign_count, Ordering::Relaxed);
        self
    }

    /// Raw credential id.
    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    /// Uncompressed SEC1 public key.
    pub fn public_key_sec1(&self) -> Vec<u8> {
        self.key
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    /// x-coordinate of the public key.
    pub fn pubkey(&self) -> Uint256 {
        x_coordinate(self.key.verifying_key()).unwrap_or_default()
    }
}

#[async_trait]
impl CredentialProvider for SoftwareAuthenticator {
    async fn get_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<WebAuthnAssertion, CredentialError> {
        if !request.allow_credentials.is_empty()
            && !request.allow_credentials.contains(&self.credential_id)
        {
            return Err(CredentialError::NoCredential);
        }
        let sign_count = self
            .sign_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| count.checked_add(1))
            .map_err(|_| CredentialError::Platform("signature counter exhausted".into()))?
            + 1;

        let mut authenticator_data = Sha256::digest(request.rp_id.as_bytes()).to_vec();
        authenticator_data.push(FLAGS);
        authenticator_data.extend_from_slice(&sign_count.to_be_bytes());

        let mut client_data_json = client_data_prefix(&request.challenge, &self.origin);
        client_data_json.push_str(&self.client_data_outro);
        let client_data_json = client_data_json.into_bytes();

        let digest = signed_digest(&authenticator_data, &client_data_json);
        let signature: Signature = self
            .key
            .sign_prehash(&digest)
            .map_err(|e| CredentialError::Platform(e.to_string()))?;

        Ok(WebAuthnAssertion {
            authenticator_data,
            client_data_json,
            signature: signature.to_der().as_bytes().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webauthn::{UserVerification, parse_authenticator_data};
    use crate::rp_id_hash;

    fn config() -> WebauthnConfig {
        serde_json::from_str(r#"{"origin":"https://example.com","rp_id":"example.com"}"#).unwrap()
    }

    fn request() -> AssertionRequest {
        AssertionRequest {
            challenge: vec![1, 2, 3],
            rp_id: "example.com".into(),
            allow_credentials: vec![],
            user_verification: UserVerification::Required,
        }
    }

    #[tokio::test]
    async fn it_increments_the_signature_counter() {
        let authenticator = SoftwareAuthenticator::new(&config()).with_sign_count(41);
        let assertion = authenticator.get_assertion(request()).await.unwrap();
        let (flags, sign_count) = parse_authenticator_data(
            &assertion.authenticator_data,
            rp_id_hash("example.com"),
        )
        .unwrap();
        assert_eq!(flags, FLAGS);
        assert_eq!(sign_count, 42);
    }

    #[tokio::test]
    async fn it_refuses_to_wrap_the_signature_counter() {
        let authenticator = SoftwareAuthenticator::new(&config()).with_sign_count(u32::MAX - 1);
        assert!(authenticator.get_assertion(request()).await.is_ok());
        assert!(matches!(
            authenticator.get_assertion(request()).await,
            Err(CredentialError::Platform(_))
        ));
    }
}
