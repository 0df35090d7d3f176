//! Session descriptors and their SNIP-12 revision 1 hashes.

use crate::SessionError;
use aegis_typed_data::{
    AccountContext, ByteArray, Call, Domain, MerkleTree, Revision, deserialize_felt_literal,
    domain::type_hash, parse_felt, selector, short_string_literal,
};
use serde::{Deserialize, Serialize};
use starknet_crypto::poseidon_hash_many;
use starknet_types_core::felt::Felt;

/// Domain name of session messages.
pub const SESSION_DOMAIN_NAME: &[u8] = b"SessionAccount.session";

/// Encoded type of an allow-list entry.
pub const ALLOWED_METHOD_TYPE: &str =
    r#""Allowed Method"("Contract Address":"ContractAddress","selector":"selector")"#;

/// Encoded type of a session.
pub const SESSION_TYPE: &str = r#""Session"("Expires At":"timestamp","Allowed Methods":"merkletree","Metadata":"string","Session Key":"felt")"#;

/// Session domain on `chain_id`: version `"1"`, revision 1.
pub fn session_domain(chain_id: Felt) -> Domain {
    Domain::new(
        short_string_literal(SESSION_DOMAIN_NAME),
        short_string_literal(b"1"),
        chain_id,
        Revision::V1,
    )
}

/// A `(contract, entry point)` pair a session may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllowedMethod {
    /// Target contract.
    #[serde(deserialize_with = "deserialize_felt_literal")]
    pub contract_address: Felt,
    /// Entry point selector.
    #[serde(deserialize_with = "deserialize_felt_literal")]
    pub selector: Felt,
}

impl AllowedMethod {
    /// Allow `selector` on `contract_address`.
    pub const fn new(contract_address: Felt, selector: Felt) -> Self {
        Self {
            contract_address,
            selector,
        }
    }

    /// Allow the entry point called `entry_point` on a contract given as a
    /// felt literal.
    ///
    /// # Errors
    ///
    /// Fails if the address literal cannot be parsed.
    pub fn parse(contract_address: &str, entry_point: &str) -> Result<Self, SessionError> {
        Ok(Self::new(parse_felt(contract_address)?, selector(entry_point)))
    }

    /// Merkle leaf of this entry.
    pub fn leaf(&self) -> Felt {
        poseidon_hash_many(&[
            type_hash(ALLOWED_METHOD_TYPE),
            self.contract_address,
            self.selector,
        ])
    }

    /// Whether `call` targets exactly this method.
    pub fn matches(&self, call: &Call) -> bool {
        self.contract_address == call.to && self.selector == call.selector
    }
}

/// The session as the dapp and the owner see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffChainSession {
    /// Unix timestamp after which the account refuses the session.
    pub expires_at: u64,
    /// Allow-list; its order is the Merkle leaf order.
    pub allowed_methods: Vec<AllowedMethod>,
    /// Free-form metadata, hashed as a Cairo byte array.
    pub metadata: String,
    /// GUID of the session key.
    pub session_key_guid: Felt,
}

impl OffChainSession {
    /// Create a session.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyAllowList`] if no method is allowed.
    pub fn new(
        expires_at: u64,
        allowed_methods: Vec<AllowedMethod>,
        metadata: impl Into<String>,
        session_key_guid: Felt,
    ) -> Result<Self, SessionError> {
        if allowed_methods.is_empty() {
            return Err(SessionError::EmptyAllowList);
        }
        Ok(Self {
            expires_at,
            allowed_methods,
            metadata: metadata.into(),
            session_key_guid,
        })
    }

    /// Whether the account would refuse the session at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// Merkle tree over the allow-list.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyAllowList`] for a session deserialized without
    /// methods.
    pub fn merkle_tree(&self) -> Result<MerkleTree, SessionError> {
        let leaves = self.allowed_methods.iter().map(AllowedMethod::leaf).collect();
        MerkleTree::new(leaves, Revision::V1).map_err(|_| SessionError::EmptyAllowList)
    }

    /// Poseidon hash of the metadata as a Cairo byte array.
    pub fn metadata_hash(&self) -> Felt {
        ByteArray::from(self.metadata.as_str()).hash()
    }

    /// Index of the first allow-list entry matching `call`.
    pub fn method_index(&self, call: &Call) -> Option<usize> {
        self.allowed_methods
            .iter()
            .position(|method| method.matches(call))
    }

    /// The form the account stores and hashes.
    ///
    /// # Errors
    ///
    /// See [`OffChainSession::merkle_tree`].
    pub fn to_on_chain(&self) -> Result<OnChainSession, SessionError> {
        Ok(self.to_on_chain_with(&self.merkle_tree()?))
    }

    pub(crate) fn to_on_chain_with(&self, tree: &MerkleTree) -> OnChainSession {
        OnChainSession {
            expires_at: self.expires_at,
            allowed_methods_root: tree.root(),
            metadata_hash: self.metadata_hash(),
            session_key_guid: self.session_key_guid,
        }
    }

    /// SNIP-12 message hash the owner signs to grant the session.
    ///
    /// # Errors
    ///
    /// See [`OffChainSession::merkle_tree`].
    pub fn message_hash(&self, context: &AccountContext) -> Result<Felt, SessionError> {
        Ok(self.to_on_chain()?.message_hash(context))
    }
}

/// A session reduced to the fields the account hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OnChainSession {
    /// Expiry timestamp.
    pub expires_at: u64,
    /// Root of the allow-list tree.
    pub allowed_methods_root: Felt,
    /// Hash of the metadata byte array.
    pub metadata_hash: Felt,
    /// GUID of the session key.
    pub session_key_guid: Felt,
}

impl OnChainSession {
    /// Struct hash under [`SESSION_TYPE`].
    pub fn struct_hash(&self) -> Felt {
        poseidon_hash_many(&[
            type_hash(SESSION_TYPE),
            Felt::from(self.expires_at),
            self.allowed_methods_root,
            self.metadata_hash,
            self.session_key_guid,
        ])
    }

    /// SNIP-12 message hash for the account in `context`.
    pub fn message_hash(&self, context: &AccountContext) -> Felt {
        session_domain(context.chain_id).message_hash(context.address, self.struct_hash())
    }

    /// `[expires_at, allowed_methods_root, metadata_hash, session_key_guid]`.
    pub fn to_felts(&self) -> [Felt; 4] {
        [
            Felt::from(self.expires_at),
            self.allowed_methods_root,
            self.metadata_hash,
            self.session_key_guid,
        ]
    }
}
