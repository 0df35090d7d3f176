//! Starknet typed data primitives.
//!
//! This crate holds the encoding layer every authorization artifact is built
//! on: field element helpers (short strings, Cairo byte arrays,
//! `starknet_keccak` selectors), [SNIP-12] domains and message hashing for
//! both revisions, the commutative Merkle tree used for session allow-lists,
//! and the [`AccountContext`] every message hash is bound to.
//!
//! Everything here is pure. Hashes computed by this crate must match the
//! on-chain recomputation bit-for-bit, so encodings are spelled out exactly
//! and never inferred from runtime data.
//!
//! [SNIP-12]: https://github.com/starknet-io/SNIPs/blob/main/SNIPS/snip-12.md

#![warn(missing_docs)]

pub mod byte_array;
pub mod call;
pub mod context;
pub mod domain;
pub mod error;
pub mod felt;
pub mod merkle;
pub mod revision;

pub use byte_array::ByteArray;
pub use call::Call;
pub use context::AccountContext;
pub use domain::Domain;
pub use error::{MerkleError, TypedDataError};
pub use felt::*;
pub use merkle::MerkleTree;
pub use revision::Revision;

pub use starknet_types_core::felt::Felt;
