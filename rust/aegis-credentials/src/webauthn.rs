//! WebAuthn P-256 credentials as account signers.
//!
//! An authenticator never signs the account's message hash directly. It signs
//! `SHA-256(authenticatorData || SHA-256(clientDataJSON))`, where the client
//! data embeds a challenge derived from the hash. The account rebuilds both
//! structures from a compact record and re-derives the digest, so decoding
//! an assertion means checking that the authenticator produced exactly the
//! bytes the account will rebuild, then recovering the parity the account
//! needs for public key recovery.
//!
//! Flow:
//! 1. [`challenge`] binds the message hash and the SHA-256 implementation
//! 2. a [`CredentialProvider`] returns a [`WebAuthnAssertion`]
//! 3. [`decode_assertion`] validates it and yields a [`WebAuthnSignatureRecord`]

mod assertion;
#[cfg(any(test, feature = "helpers"))]
mod authenticator;
mod codec;
mod der;
mod record;
mod signer;

pub use assertion::{AssertionRequest, CredentialProvider, UserVerification, WebAuthnAssertion};
#[cfg(any(test, feature = "helpers"))]
pub use authenticator::SoftwareAuthenticator;
pub use codec::{
    challenge, client_data_outro, client_data_prefix, decode_assertion,
    parse_authenticator_data, signed_digest,
};
pub use der::{parse_der_signature, strip_integer_padding};
pub use record::{Sha256Implementation, WebAuthnSignatureRecord};
pub use signer::{WebauthnConfig, WebauthnSigner};
