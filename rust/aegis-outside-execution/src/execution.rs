//! SNIP-9 outside execution typed data.

use aegis_typed_data::{
    Call, Domain, Revision, domain::type_hash, felt_from_len, selector, short_string_literal,
};
use serde::{Deserialize, Serialize};
use starknet_crypto::poseidon_hash_many;
use starknet_types_core::felt::Felt;

/// Domain name shared by both versions.
pub const DOMAIN_NAME: &[u8] = b"Account.execute_from_outside";

/// Encoded `OutsideExecution` type, version 1 (revision 0).
pub const OUTSIDE_EXECUTION_TYPE_V1: &str = "OutsideExecution(caller:felt,nonce:felt,execute_after:felt,execute_before:felt,calls_len:felt,calls:OutsideCall*)OutsideCall(to:felt,selector:felt,calldata_len:felt,calldata:felt*)";

/// Encoded `OutsideCall` type, version 1 (revision 0).
pub const OUTSIDE_CALL_TYPE_V1: &str =
    "OutsideCall(to:felt,selector:felt,calldata_len:felt,calldata:felt*)";

/// Encoded `OutsideExecution` type, version 2 (revision 1).
pub const OUTSIDE_EXECUTION_TYPE_V2: &str = r#""OutsideExecution"("Caller":"ContractAddress","Nonce":"felt","Execute After":"u128","Execute Before":"u128","Calls":"Call*")"Call"("To":"ContractAddress","Selector":"selector","Calldata":"felt*")"#;

/// Encoded `Call` type, version 2 (revision 1).
pub const CALL_TYPE_V2: &str =
    r#""Call"("To":"ContractAddress","Selector":"selector","Calldata":"felt*")"#;

/// Caller value that lets anyone submit the execution.
pub fn any_caller() -> Felt {
    short_string_literal(b"ANY_CALLER")
}

/// Interface version of `execute_from_outside`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutsideExecutionVersion {
    /// Pedersen hashing, `execute_from_outside`.
    V1,
    /// Poseidon hashing, `execute_from_outside_v2`.
    #[default]
    V2,
}

impl OutsideExecutionVersion {
    /// Typed data revision.
    pub const fn revision(self) -> Revision {
        match self {
            OutsideExecutionVersion::V1 => Revision::V0,
            OutsideExecutionVersion::V2 => Revision::V1,
        }
    }

    /// Domain on `chain_id`.
    pub fn domain(self, chain_id: Felt) -> Domain {
        let name = short_string_literal(DOMAIN_NAME);
        match self {
            OutsideExecutionVersion::V1 => Domain::new(name, Felt::ONE, chain_id, Revision::V0),
            OutsideExecutionVersion::V2 => Domain::new(name, Felt::TWO, chain_id, Revision::V1),
        }
    }

    /// Account entry point that consumes this version.
    pub const fn entry_point(self) -> &'static str {
        match self {
            OutsideExecutionVersion::V1 => "execute_from_outside",
            OutsideExecutionVersion::V2 => "execute_from_outside_v2",
        }
    }

    /// Selector of [`OutsideExecutionVersion::entry_point`].
    pub fn selector(self) -> Felt {
        selector(self.entry_point())
    }
}

/// Calls an account agrees to run when submitted by `caller` within a time
/// window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutsideExecution {
    /// Who may submit; [`any_caller`] for anyone.
    pub caller: Felt,
    /// Single-use nonce.
    pub nonce: Felt,
    /// Lower bound of the validity window, exclusive.
    pub execute_after: u64,
    /// Upper bound of the validity window, exclusive.
    pub execute_before: u64,
    /// Calls to run.
    pub calls: Vec<Call>,
}

impl OutsideExecution {
    /// Struct hash under the encoding of `version`.
    pub fn struct_hash(&self, version: OutsideExecutionVersion) -> Felt {
        let revision = version.revision();
        let call_hashes: Vec<Felt> = self
            .calls
            .iter()
            .map(|call| call_hash(call, version))
            .collect();
        match version {
            OutsideExecutionVersion::V1 => revision.hash_elements(&[
                type_hash(OUTSIDE_EXECUTION_TYPE_V1),
                self.caller,
                self.nonce,
                Felt::from(self.execute_after),
                Felt::from(self.execute_before),
                felt_from_len(self.calls.len()),
                revision.hash_elements(&call_hashes),
            ]),
            OutsideExecutionVersion::V2 => poseidon_hash_many(&[
                type_hash(OUTSIDE_EXECUTION_TYPE_V2),
                self.caller,
                self.nonce,
                Felt::from(self.execute_after),
                Felt::from(self.execute_before),
                poseidon_hash_many(&call_hashes),
            ]),
        }
    }

    /// Message hash the account verifies the signature against.
    pub fn message_hash(
        &self,
        version: OutsideExecutionVersion,
        chain_id: Felt,
        account: Felt,
    ) -> Felt {
        version
            .domain(chain_id)
            .message_hash(account, self.struct_hash(version))
    }

    /// Serialized struct: `[caller, nonce, after, before, calls.len, calls...]`.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = vec![
            self.caller,
            self.nonce,
            Felt::from(self.execute_after),
            Felt::from(self.execute_before),
            felt_from_len(self.calls.len()),
        ];
        for call in &self.calls {
            felts.extend(call.to_felts());
        }
        felts
    }
}

/// Struct hash of a single call.
pub fn call_hash(call: &Call, version: OutsideExecutionVersion) -> Felt {
    match version {
        OutsideExecutionVersion::V1 => {
            let revision = version.revision();
            revision.hash_elements(&[
                type_hash(OUTSIDE_CALL_TYPE_V1),
                call.to,
                call.selector,
                felt_from_len(call.calldata.len()),
                revision.hash_elements(&call.calldata),
            ])
        }
        OutsideExecutionVersion::V2 => poseidon_hash_many(&[
            type_hash(CALL_TYPE_V2),
            call.to,
            call.selector,
            poseidon_hash_many(&call.calldata),
        ]),
    }
}
