//! Contract calls.

use crate::felt::felt_from_len;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// A single contract invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Call {
    /// Target contract address.
    pub to: Felt,
    /// Entry point selector.
    pub selector: Felt,
    /// Raw calldata.
    pub calldata: Vec<Felt>,
}

impl Call {
    /// Create a call.
    pub fn new(to: Felt, selector: Felt, calldata: Vec<Felt>) -> Self {
        Self {
            to,
            selector,
            calldata,
        }
    }

    /// Serialize as Cairo's `Call` struct: `[to, selector, calldata.len, calldata...]`.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = Vec::with_capacity(self.calldata.len() + 3);
        felts.push(self.to);
        felts.push(self.selector);
        felts.push(felt_from_len(self.calldata.len()));
        felts.extend_from_slice(&self.calldata);
        felts
    }
}
