//! Authorized sessions.

use crate::{OffChainSession, OnChainSession, SessionError};
use aegis_credentials::AggregateSigner;
use aegis_typed_data::{AccountContext, Call, MerkleTree};
use starknet_crypto::poseidon_hash;
use starknet_types_core::felt::Felt;
use tracing::debug;

/// The value signed for each session transaction.
pub fn session_with_tx_hash(tx_hash: Felt, session_message_hash: Felt) -> Felt {
    poseidon_hash(tx_hash, session_message_hash)
}

/// A session together with the owner's authorization of it.
///
/// Keeps the allow-list tree so proofs can be produced for every
/// transaction made during the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    session: OffChainSession,
    tree: MerkleTree,
    on_chain: OnChainSession,
    message_hash: Felt,
    authorization: Vec<Felt>,
}

impl SessionGrant {
    /// Have `authorizer` (the owner, optionally with the guardian) sign the
    /// session for the account in `context`.
    ///
    /// # Errors
    ///
    /// Fails if the session has no methods or any authorizer fails.
    pub async fn authorize(
        session: OffChainSession,
        context: &AccountContext,
        authorizer: &AggregateSigner,
    ) -> Result<Self, SessionError> {
        let tree = session.merkle_tree()?;
        let on_chain = session.to_on_chain_with(&tree);
        let message_hash = on_chain.message_hash(context);
        let authorization = authorizer.sign_raw(message_hash).await?;
        debug!(
            session_hash = %format!("{message_hash:#x}"),
            methods = session.allowed_methods.len(),
            "authorized session"
        );
        Ok(Self {
            session,
            tree,
            on_chain,
            message_hash,
            authorization,
        })
    }

    /// Rebuild a grant whose authorization was produced elsewhere.
    ///
    /// # Errors
    ///
    /// Fails if the session has no methods.
    pub fn from_authorization(
        session: OffChainSession,
        context: &AccountContext,
        authorization: Vec<Felt>,
    ) -> Result<Self, SessionError> {
        let tree = session.merkle_tree()?;
        let on_chain = session.to_on_chain_with(&tree);
        Ok(Self {
            message_hash: on_chain.message_hash(context),
            session,
            tree,
            on_chain,
            authorization,
        })
    }

    /// The session as granted.
    pub fn session(&self) -> &OffChainSession {
        &self.session
    }

    /// The hashed form.
    pub fn on_chain(&self) -> &OnChainSession {
        &self.on_chain
    }

    /// Session message hash.
    pub fn message_hash(&self) -> Felt {
        self.message_hash
    }

    /// Authorizer signature felts.
    pub fn authorization(&self) -> &[Felt] {
        &self.authorization
    }

    /// Allow-list tree.
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Value the session key and guardian sign for `tx_hash`.
    pub fn session_with_tx_hash(&self, tx_hash: Felt) -> Felt {
        session_with_tx_hash(tx_hash, self.message_hash)
    }

    /// Allow-list proof for each call, in call order.
    ///
    /// Every call is matched before any proof is built. A method listed twice
    /// is proven through its first entry.
    ///
    /// # Errors
    ///
    /// [`SessionError::CallNotInGrant`] for the first call without a match.
    pub fn proofs(&self, calls: &[Call]) -> Result<Vec<Vec<Felt>>, SessionError> {
        let indices = calls
            .iter()
            .map(|call| {
                self.session
                    .method_index(call)
                    .ok_or(SessionError::CallNotInGrant {
                        to: call.to,
                        selector: call.selector,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        indices
            .into_iter()
            .map(|index| self.tree.proof(index).map_err(SessionError::from))
            .collect()
    }
}
