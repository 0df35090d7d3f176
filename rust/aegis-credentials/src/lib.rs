//! Signers and signatures for a multi-signer Starknet account.
//!
//! The account accepts a closed set of signer kinds: Stark-curve keys,
//! secp256k1 and secp256r1 keys, and WebAuthn credentials. Each kind is
//! identified on chain by a [`SignerIdentity`] and its GUID, and produces a
//! [`SignerSignature`] whose calldata form the account deserializes and
//! verifies.
//!
//! - [`normalize`] canonicalizes ECDSA signatures to low-S form
//! - [`Signer`] signs an arbitrary message hash with any kind
//! - [`AggregateSigner`] and [`MultisigSigner`] combine several signers
//! - [`webauthn`] turns authenticator assertions into on-chain records
//! - [`TransactionSigner`] is the seam the session and outside-execution
//!   builders sign through
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), aegis_credentials::SignerError> {
//! use aegis_credentials::{AggregateSigner, StarknetSigner};
//! use starknet_types_core::felt::Felt;
//!
//! let owner = StarknetSigner::random();
//! let guardian = StarknetSigner::random();
//! let signer = AggregateSigner::new(vec![owner.into(), guardian.into()])?;
//! let signature = signer.sign_raw(Felt::from(42u64)).await?;
//! assert_eq!(signature[0], Felt::TWO);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod aggregate;
mod error;
mod identity;
pub mod normalize;
mod signer;
mod signer_signature;
mod transaction;
mod uint;
pub mod webauthn;

pub use aggregate::{
    AggregateSigner, MultisigSigner, compile_signatures, ensure_sorted, sort_by_guid,
};
pub use error::{CredentialError, SignerError, WebAuthnError};
pub use identity::{SignerIdentity, SignerType, WebauthnIdentity, rp_id_hash};
pub use normalize::{Curve, RawSignature};
pub use signer::{
    Secp256k1Signer, Secp256r1Signer, Signer, StarknetSigner, ethereum_address, x_coordinate,
};
pub use signer_signature::SignerSignature;
pub use transaction::TransactionSigner;
pub use uint::Uint256;
pub use webauthn::{CredentialProvider, Sha256Implementation, WebauthnConfig, WebauthnSigner};
