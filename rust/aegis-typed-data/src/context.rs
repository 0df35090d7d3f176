//! Explicit account context.
//!
//! Every message hash is bound to a chain and an account address. Callers
//! create one [`AccountContext`] per account and pass it to the builders,
//! instead of the builders reading ambient state.

use crate::felt::{deserialize_felt_literal, short_string_literal};
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// Chain id of Starknet mainnet (`"SN_MAIN"`).
pub fn mainnet() -> Felt {
    short_string_literal(b"SN_MAIN")
}

/// Chain id of the Sepolia testnet (`"SN_SEPOLIA"`).
pub fn sepolia() -> Felt {
    short_string_literal(b"SN_SEPOLIA")
}

/// The account on whose behalf artifacts are built.
///
/// Deserializes from literals such as
/// `{"chain_id": "SN_SEPOLIA", "address": "0x1234"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountContext {
    /// Chain id as a felt.
    #[serde(deserialize_with = "deserialize_felt_literal")]
    pub chain_id: Felt,
    /// Account contract address.
    #[serde(deserialize_with = "deserialize_felt_literal")]
    pub address: Felt,
}

impl AccountContext {
    /// Create a context.
    pub const fn new(chain_id: Felt, address: Felt) -> Self {
        Self { chain_id, address }
    }
}
