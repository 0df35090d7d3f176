//! Error types for typed data encoding.

use thiserror::Error;

/// Errors from encoding values into field elements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypedDataError {
    /// The string does not fit into a single field element.
    #[error("short string longer than 31 characters: {0:?}")]
    ShortStringTooLong(String),

    /// Short strings are limited to ASCII.
    #[error("short string is not ASCII: {0:?}")]
    NonAsciiShortString(String),

    /// A hex or decimal literal could not be parsed as a field element.
    #[error("invalid felt literal: {0:?}")]
    InvalidFelt(String),
}

/// Errors from Merkle tree construction and proof generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("cannot build a Merkle tree without leaves")]
    Empty,

    /// The requested leaf does not exist.
    #[error("leaf index {index} out of bounds for {len} leaves")]
    IndexOutOfBounds {
        /// Requested leaf index.
        index: usize,
        /// Number of leaves in the tree.
        len: usize,
    },
}
