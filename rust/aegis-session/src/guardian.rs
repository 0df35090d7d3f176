//! Guardian co-signing of session calls.

use crate::{GuardianError, OffChainSession, session_with_tx_hash};
use aegis_credentials::{SignerSignature, StarknetSigner};
use aegis_typed_data::{AccountContext, Call};
use async_trait::async_trait;
use starknet_types_core::felt::Felt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// What the guardian is asked to co-sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosignRequest {
    /// Calls the session key is about to execute.
    pub calls: Vec<Call>,
    /// Transaction hash.
    pub tx_hash: Felt,
    /// The grant the calls are made under.
    pub session: OffChainSession,
    /// `poseidon(tx_hash, session_message_hash)`, the value to sign.
    pub session_with_tx_hash: Felt,
}

/// A guardian service that counter-signs session transactions.
///
/// Usually a remote backend; a refusal is reported as
/// [`GuardianError::Rejected`] and surfaced verbatim.
#[async_trait]
pub trait GuardianBackend: Send + Sync {
    /// Co-sign `request.session_with_tx_hash`.
    async fn cosign(&self, request: CosignRequest) -> Result<SignerSignature, GuardianError>;
}

/// A guardian holding its key in process.
///
/// Before signing it refuses an expired session, recomputes the session
/// hash for its own account context and checks every call against the
/// allow-list, so a tampered request is refused rather than signed.
#[derive(Debug, Clone)]
pub struct LocalGuardian {
    signer: StarknetSigner,
    context: AccountContext,
    clock: fn() -> u64,
}

impl LocalGuardian {
    /// Guardian for the account in `context`, reading the system clock.
    pub fn new(signer: StarknetSigner, context: AccountContext) -> Self {
        Self {
            signer,
            context,
            clock: unix_now,
        }
    }

    /// Replace the clock used for expiry checks. It returns Unix seconds.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// The guardian key.
    pub fn signer(&self) -> &StarknetSigner {
        &self.signer
    }

    fn check(&self, request: &CosignRequest) -> Result<Felt, GuardianError> {
        let now = (self.clock)();
        if request.session.is_expired(now) {
            return Err(GuardianError::Rejected(format!(
                "session expired at {}",
                request.session.expires_at
            )));
        }
        if let Some(call) = request
            .calls
            .iter()
            .find(|call| request.session.method_index(call).is_none())
        {
            return Err(GuardianError::Rejected(format!(
                "call {:#x} on {:#x} is outside the session",
                call.selector, call.to
            )));
        }
        let session_hash = request
            .session
            .message_hash(&self.context)
            .map_err(|e| GuardianError::Rejected(e.to_string()))?;
        let expected = session_with_tx_hash(request.tx_hash, session_hash);
        if expected != request.session_with_tx_hash {
            return Err(GuardianError::Rejected("session hash mismatch".into()));
        }
        Ok(expected)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[async_trait]
impl GuardianBackend for LocalGuardian {
    async fn cosign(&self, request: CosignRequest) -> Result<SignerSignature, GuardianError> {
        let hash = self.check(&request).inspect_err(|error| {
            warn!(%error, "guardian refused to co-sign");
        })?;
        let signature = self
            .signer
            .sign_raw(hash)
            .map_err(|e| GuardianError::Rejected(e.to_string()))?;
        debug!(calls = request.calls.len(), "guardian co-signed session call");
        Ok(signature)
    }
}
