//! Cairo `ByteArray` encoding.
//!
//! Long strings are split into 31-byte words; the trailing partial word is
//! carried separately together with its length. SNIP-12 revision 1 hashes a
//! `string` value as the Poseidon hash of this serialization.

use crate::felt::felt_from_len;
use serde::{Deserialize, Serialize};
use starknet_crypto::poseidon_hash_many;
use starknet_types_core::felt::Felt;

/// Number of bytes stored in one full word.
pub const BYTES_PER_WORD: usize = 31;

/// A string laid out the way Cairo's `ByteArray` stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteArray {
    data: Vec<Felt>,
    pending_word: Felt,
    pending_word_len: usize,
}

impl ByteArray {
    /// Split `bytes` into full words and a pending word.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut words = bytes.chunks_exact(BYTES_PER_WORD);
        let data = words.by_ref().map(Felt::from_bytes_be_slice).collect();
        let pending = words.remainder();
        Self {
            data,
            pending_word: Felt::from_bytes_be_slice(pending),
            pending_word_len: pending.len(),
        }
    }

    /// Full 31-byte words.
    pub fn data(&self) -> &[Felt] {
        &self.data
    }

    /// Trailing partial word (zero when the input length is a multiple of 31).
    pub const fn pending_word(&self) -> Felt {
        self.pending_word
    }

    /// Number of bytes in the pending word.
    pub const fn pending_word_len(&self) -> usize {
        self.pending_word_len
    }

    /// Calldata serialization: `[data.len, data..., pending_word, pending_word_len]`.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = Vec::with_capacity(self.data.len() + 3);
        felts.push(felt_from_len(self.data.len()));
        felts.extend_from_slice(&self.data);
        felts.push(self.pending_word);
        felts.push(felt_from_len(self.pending_word_len));
        felts
    }

    /// Poseidon hash of the serialization, as SNIP-12 revision 1 hashes `string`.
    pub fn hash(&self) -> Felt {
        poseidon_hash_many(&self.to_felts())
    }
}

impl From<&str> for ByteArray {
    fn from(value: &str) -> Self {
        Self::from_bytes(value.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_keeps_short_input_in_the_pending_word() {
        let bytes = ByteArray::from("hello");
        assert!(bytes.data().is_empty());
        assert_eq!(bytes.pending_word(), Felt::from_bytes_be_slice(b"hello"));
        assert_eq!(bytes.pending_word_len(), 5);
        assert_eq!(
            bytes.to_felts(),
            vec![Felt::ZERO, Felt::from_bytes_be_slice(b"hello"), Felt::from(5u64)]
        );
    }

    #[test]
    fn it_splits_long_input_into_words() {
        let text = "a".repeat(31) + "bc";
        let bytes = ByteArray::from(text.as_str());
        assert_eq!(bytes.data().len(), 1);
        assert_eq!(bytes.data()[0], Felt::from_bytes_be_slice(&[b'a'; 31]));
        assert_eq!(bytes.pending_word(), Felt::from_bytes_be_slice(b"bc"));
        assert_eq!(bytes.pending_word_len(), 2);
    }

    #[test]
    fn it_leaves_an_empty_pending_word_on_exact_multiples() {
        let text = "z".repeat(62);
        let bytes = ByteArray::from(text.as_str());
        assert_eq!(bytes.data().len(), 2);
        assert_eq!(bytes.pending_word(), Felt::ZERO);
        assert_eq!(bytes.pending_word_len(), 0);
    }

    #[test]
    fn it_hashes_different_strings_differently() {
        assert_ne!(ByteArray::from("metadata").hash(), ByteArray::from("metadatb").hash());
        assert_eq!(ByteArray::from("same").hash(), ByteArray::from("same").hash());
    }
}
