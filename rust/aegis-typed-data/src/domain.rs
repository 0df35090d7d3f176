//! SNIP-12 domains and message hashing.

use crate::{
    felt::{short_string_literal, starknet_keccak},
    revision::Revision,
};
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// Prefix of every off-chain message hash.
pub const STARKNET_MESSAGE: &[u8] = b"StarkNet Message";

/// Encoded type of the revision 0 domain.
pub const DOMAIN_TYPE_V0: &str = "StarkNetDomain(name:felt,version:felt,chainId:felt)";

/// Encoded type of the revision 1 domain.
pub const DOMAIN_TYPE_V1: &str = r#""StarknetDomain"("name":"shortstring","version":"shortstring","chainId":"shortstring","revision":"shortstring")"#;

/// Type hash of an encoded type string.
pub fn type_hash(encoded_type: &str) -> Felt {
    starknet_keccak(encoded_type.as_bytes())
}

/// A typed data domain separating one protocol's messages from another's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain {
    /// Protocol name, usually a short string.
    pub name: Felt,
    /// Protocol version.
    pub version: Felt,
    /// Chain the message is valid on.
    pub chain_id: Felt,
    /// Encoding revision.
    pub revision: Revision,
}

impl Domain {
    /// Create a domain.
    pub const fn new(name: Felt, version: Felt, chain_id: Felt, revision: Revision) -> Self {
        Self {
            name,
            version,
            chain_id,
            revision,
        }
    }

    /// Hash of this domain's encoded type.
    pub fn type_hash(&self) -> Felt {
        match self.revision {
            Revision::V0 => type_hash(DOMAIN_TYPE_V0),
            Revision::V1 => type_hash(DOMAIN_TYPE_V1),
        }
    }

    /// Struct hash of the domain itself.
    pub fn struct_hash(&self) -> Felt {
        match self.revision {
            Revision::V0 => Revision::V0.hash_elements(&[
                self.type_hash(),
                self.name,
                self.version,
                self.chain_id,
            ]),
            // The revision field is the literal "1", encoded as the number 1.
            Revision::V1 => Revision::V1.hash_elements(&[
                self.type_hash(),
                self.name,
                self.version,
                self.chain_id,
                Felt::ONE,
            ]),
        }
    }

    /// Final message hash of `struct_hash` signed on behalf of `account`.
    pub fn message_hash(&self, account: Felt, struct_hash: Felt) -> Felt {
        self.revision.hash_elements(&[
            short_string_literal(STARKNET_MESSAGE),
            self.struct_hash(),
            account,
            struct_hash,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::felt::short_string;

    fn domain(revision: Revision) -> Domain {
        Domain::new(
            short_string("Example").unwrap(),
            Felt::ONE,
            short_string("SN_SEPOLIA").unwrap(),
            revision,
        )
    }

    #[test]
    fn it_uses_distinct_type_hashes_per_revision() {
        assert_ne!(domain(Revision::V0).type_hash(), domain(Revision::V1).type_hash());
        assert_eq!(domain(Revision::V1).type_hash(), type_hash(DOMAIN_TYPE_V1));
    }

    #[test]
    fn it_matches_the_known_domain_type_hashes() {
        assert_eq!(
            type_hash(DOMAIN_TYPE_V0),
            Felt::from_hex_unchecked(
                "0x1bfc207425a47a5dfa1a50a4f5241203f50624ca5fdf5e18755765416b8e288"
            )
        );
        assert_eq!(
            type_hash(DOMAIN_TYPE_V1),
            Felt::from_hex_unchecked(
                "0x1ff2f602e42168014d405a94f75e8a93d640751d71d16311266e140d8b0a210"
            )
        );
    }

    #[test]
    fn it_binds_the_message_hash_to_chain_and_account() {
        let base = domain(Revision::V1);
        let other_chain = Domain {
            chain_id: short_string("SN_MAIN").unwrap(),
            ..base
        };
        let payload = Felt::from(42u64);

        let hash = base.message_hash(Felt::from(0x1234u64), payload);
        assert_ne!(hash, other_chain.message_hash(Felt::from(0x1234u64), payload));
        assert_ne!(hash, base.message_hash(Felt::from(0x5678u64), payload));
        assert_eq!(hash, base.message_hash(Felt::from(0x1234u64), payload));
    }

    #[test]
    fn it_hashes_the_legacy_domain_without_a_revision_field() {
        let legacy = domain(Revision::V0);
        assert_eq!(
            legacy.struct_hash(),
            crate::revision::pedersen_array(&[
                type_hash(DOMAIN_TYPE_V0),
                legacy.name,
                legacy.version,
                legacy.chain_id,
            ])
        );
    }
}
