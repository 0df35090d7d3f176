//! Signing transactions with a session key.

use crate::{CosignRequest, GuardianBackend, SessionError, SessionGrant, SessionToken};
use aegis_credentials::{StarknetSigner, TransactionSigner};
use aegis_typed_data::Call;
use starknet_types_core::felt::Felt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Signs transactions with a session key under a [`SessionGrant`].
///
/// Each signature is a [`SessionToken`]: the grant, the session key and
/// guardian signatures over `poseidon(tx_hash, session_message_hash)`, and one
/// allow-list proof per call.
#[derive(Clone)]
pub struct SessionSigner {
    grant: SessionGrant,
    session_key: StarknetSigner,
    guardian: Arc<dyn GuardianBackend>,
}

impl SessionSigner {
    /// Session signer for `grant`.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionKeyMismatch`] if the grant names another key.
    pub fn new(
        grant: SessionGrant,
        session_key: StarknetSigner,
        guardian: Arc<dyn GuardianBackend>,
    ) -> Result<Self, SessionError> {
        if session_key.identity().guid() != grant.session().session_key_guid {
            return Err(SessionError::SessionKeyMismatch);
        }
        Ok(Self {
            grant,
            session_key,
            guardian,
        })
    }

    /// The grant in use.
    pub fn grant(&self) -> &SessionGrant {
        &self.grant
    }

    /// Build the token for `calls` in transaction `tx_hash`.
    ///
    /// # Errors
    ///
    /// [`SessionError::CallNotInGrant`] before anything is signed if a call is
    /// outside the allow-list; otherwise session key or guardian failures.
    pub async fn sign_token(
        &self,
        tx_hash: Felt,
        calls: &[Call],
    ) -> Result<SessionToken, SessionError> {
        let proofs = self.grant.proofs(calls)?;
        let session_with_tx_hash = self.grant.session_with_tx_hash(tx_hash);
        let session_signature = self.session_key.sign_raw(session_with_tx_hash)?;
        let guardian_signature = self
            .guardian
            .cosign(CosignRequest {
                calls: calls.to_vec(),
                tx_hash,
                session: self.grant.session().clone(),
                session_with_tx_hash,
            })
            .await
            .inspect_err(|error| warn!(%error, "guardian rejected session call"))?;
        debug!(
            tx_hash = %format!("{tx_hash:#x}"),
            calls = calls.len(),
            "compiled session token"
        );
        Ok(SessionToken {
            session: *self.grant.on_chain(),
            session_authorization: self.grant.authorization().to_vec(),
            session_signature,
            guardian_signature,
            proofs,
        })
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner")
            .field("grant", &self.grant)
            .field("session_key", &self.session_key)
            .finish_non_exhaustive()
    }
}

impl TransactionSigner for SessionSigner {
    async fn sign_transaction(
        &self,
        tx_hash: Felt,
        calls: &[Call],
    ) -> Result<Vec<Felt>, signature::Error> {
        self.sign_token(tx_hash, calls)
            .await
            .map(|token| token.to_felts())
            .map_err(signature::Error::from_source)
    }
}
