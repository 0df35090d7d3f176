//! Merkle tree with commutative node pairing.
//!
//! Leaves keep the order they were given in. Two siblings are hashed
//! smaller-first, so a proof is just the list of sibling hashes and carries
//! no left/right flags. An odd node at the end of a level is paired with
//! zero. This is the layout the on-chain proof verifier expects.

use crate::{error::MerkleError, revision::Revision};
use starknet_types_core::felt::Felt;
use std::cmp::Ordering;

/// A fully built Merkle tree.
///
/// All levels are kept so that proofs for any leaf can be produced without
/// rebuilding the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Felt>>,
    revision: Revision,
}

impl MerkleTree {
    /// Build a tree over `leaves` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`MerkleError::Empty`] if there are no leaves.
    pub fn new(leaves: Vec<Felt>, revision: Revision) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::Empty);
        }

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| {
                    let sibling = pair.get(1).copied().unwrap_or(Felt::ZERO);
                    hash_siblings(revision, pair[0], sibling)
                })
                .collect();
            levels.push(next);
        }

        Ok(Self { levels, revision })
    }

    /// The root hash.
    pub fn root(&self) -> Felt {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(Felt::ZERO)
    }

    /// Leaves in insertion order.
    pub fn leaves(&self) -> &[Felt] {
        &self.levels[0]
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves().len()
    }

    /// Always false; a tree cannot be built without leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves().is_empty()
    }

    /// Revision used to hash nodes.
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Index of the first leaf equal to `leaf`.
    pub fn position(&self, leaf: &Felt) -> Option<usize> {
        self.leaves().iter().position(|candidate| candidate == leaf)
    }

    /// Sibling path from the leaf at `index` up to the root.
    ///
    /// # Errors
    ///
    /// Returns [`MerkleError::IndexOutOfBounds`] for an unknown index.
    pub fn proof(&self, index: usize) -> Result<Vec<Felt>, MerkleError> {
        if index >= self.len() {
            return Err(MerkleError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let mut path = Vec::with_capacity(self.levels.len().saturating_sub(1));
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            path.push(level.get(position ^ 1).copied().unwrap_or(Felt::ZERO));
            position /= 2;
        }
        Ok(path)
    }

    /// Check that `proof` links `leaf` to `root`.
    pub fn verify(root: Felt, leaf: Felt, proof: &[Felt], revision: Revision) -> bool {
        let computed = proof
            .iter()
            .fold(leaf, |node, sibling| hash_siblings(revision, node, *sibling));
        computed == root
    }
}

/// Hash two siblings smaller-first.
fn hash_siblings(revision: Revision, a: Felt, b: Felt) -> Felt {
    match a.cmp(&b) {
        Ordering::Greater => revision.hash_pair(b, a),
        Ordering::Less | Ordering::Equal => revision.hash_pair(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(count: u64) -> Vec<Felt> {
        (1..=count).map(|value| Felt::from(value * 1_000_003)).collect()
    }

    #[test]
    fn it_refuses_to_build_an_empty_tree() {
        assert_eq!(MerkleTree::new(vec![], Revision::V1), Err(MerkleError::Empty));
    }

    #[test]
    fn it_uses_the_single_leaf_as_root() {
        let tree = MerkleTree::new(leaves(1), Revision::V1).unwrap();
        assert_eq!(tree.root(), leaves(1)[0]);
        assert_eq!(tree.proof(0).unwrap(), Vec::<Felt>::new());
        assert!(MerkleTree::verify(tree.root(), leaves(1)[0], &[], Revision::V1));
    }

    #[test]
    fn it_pairs_two_leaves_commutatively() {
        let forward = MerkleTree::new(vec![Felt::ONE, Felt::TWO], Revision::V1).unwrap();
        let backward = MerkleTree::new(vec![Felt::TWO, Felt::ONE], Revision::V1).unwrap();
        assert_eq!(forward.root(), backward.root());
        assert_eq!(forward.root(), Revision::V1.hash_pair(Felt::ONE, Felt::TWO));
    }

    #[test]
    fn it_orders_siblings_numerically() {
        let small = Felt::from(255u64);
        let large = Felt::from(256u64);
        let wide = Felt::from_hex_unchecked("0x100000000000000000000000000000000");
        for revision in [Revision::V0, Revision::V1] {
            assert_eq!(hash_siblings(revision, large, small), revision.hash_pair(small, large));
            assert_eq!(hash_siblings(revision, wide, large), revision.hash_pair(large, wide));
            assert_eq!(hash_siblings(revision, small, wide), revision.hash_pair(small, wide));
        }
    }

    #[test]
    fn it_pairs_a_trailing_node_with_zero() {
        let tree = MerkleTree::new(leaves(3), Revision::V1).unwrap();
        let l = leaves(3);
        let left = hash_siblings(Revision::V1, l[0], l[1]);
        let right = hash_siblings(Revision::V1, l[2], Felt::ZERO);
        assert_eq!(tree.root(), hash_siblings(Revision::V1, left, right));
        assert_eq!(tree.proof(2).unwrap(), vec![Felt::ZERO, left]);
    }

    #[test]
    fn it_reports_out_of_bounds_proofs() {
        let tree = MerkleTree::new(leaves(4), Revision::V1).unwrap();
        assert_eq!(
            tree.proof(4),
            Err(MerkleError::IndexOutOfBounds { index: 4, len: 4 })
        );
    }

    #[test]
    fn it_finds_the_first_duplicate_leaf() {
        let tree = MerkleTree::new(
            vec![Felt::ONE, Felt::TWO, Felt::ONE, Felt::THREE],
            Revision::V1,
        )
        .unwrap();
        assert_eq!(tree.position(&Felt::ONE), Some(0));
        assert_eq!(tree.position(&Felt::from(99u64)), None);
    }

    #[test]
    fn it_rejects_a_proof_for_a_foreign_leaf() {
        let tree = MerkleTree::new(leaves(5), Revision::V0).unwrap();
        let proof = tree.proof(1).unwrap();
        assert!(MerkleTree::verify(tree.root(), leaves(5)[1], &proof, Revision::V0));
        assert!(!MerkleTree::verify(tree.root(), Felt::from(7u64), &proof, Revision::V0));
        assert!(!MerkleTree::verify(tree.root(), leaves(5)[1], &proof, Revision::V1));
    }
}
