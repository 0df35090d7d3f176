//! SNIP-12 revisions.
//!
//! Revision 0 hashes structs with the Pedersen array hash, revision 1 with
//! Poseidon. The choice also drives how Merkle tree nodes are paired.

use crate::felt::felt_from_len;
use serde::{Deserialize, Serialize};
use starknet_crypto::{pedersen_hash, poseidon_hash, poseidon_hash_many};
use starknet_types_core::felt::Felt;

/// Typed data revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Revision {
    /// Legacy revision: `StarkNetDomain`, Pedersen hashing.
    V0,
    /// Active revision: `StarknetDomain` with an explicit revision field, Poseidon hashing.
    V1,
}

impl Revision {
    /// Hash a sequence of elements.
    pub fn hash_elements(self, elements: &[Felt]) -> Felt {
        match self {
            Revision::V0 => pedersen_array(elements),
            Revision::V1 => poseidon_hash_many(elements),
        }
    }

    /// Hash exactly two elements, in the given order.
    pub fn hash_pair(self, a: Felt, b: Felt) -> Felt {
        match self {
            Revision::V0 => pedersen_hash(&a, &b),
            Revision::V1 => poseidon_hash(a, b),
        }
    }
}

/// Pedersen hash chain over `elements`, closed with the element count.
///
/// This is `compute_hash_on_elements` from the Starknet protocol:
/// `h(h(h(h(0, e0), e1), ...), len)`.
pub fn pedersen_array(elements: &[Felt]) -> Felt {
    let chained = elements
        .iter()
        .fold(Felt::ZERO, |acc, element| pedersen_hash(&acc, element));
    pedersen_hash(&chained, &felt_from_len(elements.len()))
}
