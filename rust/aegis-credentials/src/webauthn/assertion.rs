//! The platform credential capability.

use crate::CredentialError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// User verification requirement passed to the authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
    /// The authenticator must verify the user (biometric or PIN).
    Required,
    /// Verify the user if the authenticator can.
    Preferred,
    /// Skip user verification.
    Discouraged,
}

/// Parameters of a `navigator.credentials.get()` style request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRequest {
    /// Raw challenge bytes; the platform base64url-encodes them into
    /// `clientDataJSON`.
    pub challenge: Vec<u8>,
    /// Relying party id.
    pub rp_id: String,
    /// Credential ids the platform may use. Empty allows any.
    pub allow_credentials: Vec<Vec<u8>>,
    /// User verification requirement.
    pub user_verification: UserVerification,
}

/// What an authenticator returns for an assertion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAuthnAssertion {
    /// Raw authenticator data.
    pub authenticator_data: Vec<u8>,
    /// Raw `clientDataJSON` bytes.
    pub client_data_json: Vec<u8>,
    /// DER-encoded ECDSA signature.
    pub signature: Vec<u8>,
}

/// A platform credential able to produce WebAuthn assertions.
///
/// Implementations wrap a browser, an OS passkey API or a hardware token.
/// A request may block on a user gesture for an unbounded time.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Ask the platform for an assertion over `request.challenge`.
    async fn get_assertion(
        &self,
        request: AssertionRequest,
    ) -> Result<WebAuthnAssertion, CredentialError>;
}
