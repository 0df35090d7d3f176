//! Session keys for a Starknet account.
//!
//! A session lets a dapp hold a short-lived key that may only call a fixed
//! set of contract methods until an expiry time. The owner signs the session
//! once; after that each transaction carries a [`SessionToken`] with:
//!
//! - the session fields and the owner's authorization,
//! - session key and guardian signatures over
//!   `poseidon(tx_hash, session_message_hash)`,
//! - a Merkle proof per call that its `(contract, selector)` is allowed.
//!
//! The session message hash follows SNIP-12 revision 1 under the
//! `SessionAccount.session` domain.

#![warn(missing_docs)]

mod error;
mod grant;
mod guardian;
mod session;
mod signer;
mod token;

pub use error::{GuardianError, SessionError};
pub use grant::{SessionGrant, session_with_tx_hash};
pub use guardian::{CosignRequest, GuardianBackend, LocalGuardian};
pub use session::{
    ALLOWED_METHOD_TYPE, AllowedMethod, OffChainSession, OnChainSession, SESSION_DOMAIN_NAME,
    SESSION_TYPE, session_domain,
};
pub use signer::SessionSigner;
pub use token::{SessionToken, session_magic};
