//! Session error types.

use aegis_credentials::SignerError;
use aegis_typed_data::{MerkleError, TypedDataError};
use starknet_types_core::felt::Felt;
use thiserror::Error;

/// Refusal from a guardian backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardianError {
    /// The guardian declined to co-sign; the reason is passed through as given.
    #[error("{0}")]
    Rejected(String),
}

/// Errors from building or using a session grant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A call targets a method the grant does not allow.
    #[error("call {selector:#x} on {to:#x} is not allowed by the session")]
    CallNotInGrant {
        /// Target contract.
        to: Felt,
        /// Entry point selector.
        selector: Felt,
    },

    /// The guardian refused to co-sign.
    #[error("guardian rejected the session call: {0}")]
    GuardianRejected(#[from] GuardianError),

    /// A grant needs at least one allowed method.
    #[error("session allows no methods")]
    EmptyAllowList,

    /// The session key does not match the GUID the grant was issued for.
    #[error("session key does not match the grant")]
    SessionKeyMismatch,

    /// An authorizing or session signer failed.
    #[error(transparent)]
    Signer(#[from] SignerError),

    /// The allow-list tree could not be built or queried.
    #[error(transparent)]
    Merkle(#[from] MerkleError),

    /// A literal could not be encoded.
    #[error(transparent)]
    TypedData(#[from] TypedDataError),
}
