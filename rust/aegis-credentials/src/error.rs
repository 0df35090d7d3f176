//! Error types for signing and WebAuthn assertion handling.

use starknet_types_core::felt::Felt;
use thiserror::Error;

/// Failures reported by a platform credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The user dismissed the prompt or the request timed out.
    #[error("user cancelled the credential request")]
    UserCancelled,

    /// No credential on the device matches the request.
    #[error("no matching credential")]
    NoCredential,

    /// Any other platform failure, reported verbatim.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Errors from decoding a WebAuthn assertion into an on-chain record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebAuthnError {
    /// `clientDataJSON` does not have the layout the account reconstructs.
    #[error("invalid clientDataJSON: {0}")]
    InvalidClientData(String),

    /// The DER signature could not be decoded.
    #[error("invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    /// Authenticator data is malformed or bound to another relying party.
    #[error("invalid authenticator data: {0}")]
    InvalidAuthenticatorData(String),

    /// Neither parity recovers the credential's public key.
    #[error("could not recover signature parity")]
    ParityRecoveryFailed,

    /// The credential public key is not a valid P-256 point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The platform credential failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Errors from signers and signer aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// Multisig signer GUIDs are not strictly ascending.
    #[error("signers are not sorted by ascending GUID")]
    SignaturesNotSorted,

    /// The same signer appears twice.
    #[error("duplicate signer {0:#x}")]
    DuplicateSigner(Felt),

    /// An aggregate needs at least one signer.
    #[error("no signers")]
    NoSigners,

    /// Secret key material was rejected.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The underlying signature primitive failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// A WebAuthn credential could not produce a usable signature.
    #[error(transparent)]
    WebAuthn(#[from] WebAuthnError),
}
