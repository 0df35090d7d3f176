//! Session tokens, the account signature of a session transaction.

use crate::OnChainSession;
use aegis_credentials::SignerSignature;
use aegis_typed_data::{felt_from_len, short_string_literal};
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// First felt of a session signature; tells the account to parse a token.
pub fn session_magic() -> Felt {
    short_string_literal(b"session-token")
}

/// Everything the account needs to accept a call made with a session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// The grant.
    pub session: OnChainSession,
    /// Owner (and guardian) signature over the session message hash.
    pub session_authorization: Vec<Felt>,
    /// Session key signature over `poseidon(tx_hash, session_message_hash)`.
    pub session_signature: SignerSignature,
    /// Guardian signature over the same value.
    pub guardian_signature: SignerSignature,
    /// One allow-list proof per call, in call order.
    pub proofs: Vec<Vec<Felt>>,
}

impl SessionToken {
    /// Account signature felts:
    /// `[magic, session..., authorization span, session signature,
    /// guardian signature, proofs.len, (proof.len, proof...)*]`.
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = vec![session_magic()];
        felts.extend(self.session.to_felts());
        felts.push(felt_from_len(self.session_authorization.len()));
        felts.extend_from_slice(&self.session_authorization);
        felts.extend(self.session_signature.to_felts());
        felts.extend(self.guardian_signature.to_felts());
        felts.push(felt_from_len(self.proofs.len()));
        for proof in &self.proofs {
            felts.push(felt_from_len(proof.len()));
            felts.extend_from_slice(proof);
        }
        felts
    }
}
