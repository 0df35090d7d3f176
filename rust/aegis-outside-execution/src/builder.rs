//! Building and signing outside executions.

use crate::{OutsideExecution, OutsideExecutionError, OutsideExecutionVersion, any_caller};
use aegis_credentials::TransactionSigner;
use aegis_typed_data::{AccountContext, Call, felt_from_len};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;
use tracing::debug;

/// A fresh 248-bit nonce.
pub fn random_nonce() -> Felt {
    let mut bytes = [0u8; 31];
    rand::thread_rng().fill_bytes(&mut bytes);
    Felt::from_bytes_be_slice(&bytes)
}

/// Collects the fields of an outside execution for one account.
///
/// The caller defaults to [`any_caller`]; the nonce is drawn at random
/// unless set.
#[derive(Debug, Clone)]
pub struct OutsideExecutionBuilder {
    context: AccountContext,
    version: OutsideExecutionVersion,
    caller: Felt,
    nonce: Option<Felt>,
    execute_after: u64,
    execute_before: u64,
    calls: Vec<Call>,
}

impl OutsideExecutionBuilder {
    /// Builder for the account in `context`.
    pub fn new(context: AccountContext, version: OutsideExecutionVersion) -> Self {
        Self {
            context,
            version,
            caller: any_caller(),
            nonce: None,
            execute_after: 0,
            execute_before: u64::MAX,
            calls: Vec::new(),
        }
    }

    /// Restrict submission to `caller`.
    pub fn caller(mut self, caller: Felt) -> Self {
        self.caller = caller;
        self
    }

    /// Use a specific nonce.
    pub fn nonce(mut self, nonce: Felt) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Validity window, both bounds exclusive.
    pub fn window(mut self, execute_after: u64, execute_before: u64) -> Self {
        self.execute_after = execute_after;
        self.execute_before = execute_before;
        self
    }

    /// Append a call.
    pub fn call(mut self, call: Call) -> Self {
        self.calls.push(call);
        self
    }

    /// Append several calls.
    pub fn calls(mut self, calls: impl IntoIterator<Item = Call>) -> Self {
        self.calls.extend(calls);
        self
    }

    /// The unsigned execution.
    ///
    /// # Errors
    ///
    /// [`OutsideExecutionError::InvalidTimeWindow`] unless
    /// `execute_after < execute_before`.
    pub fn build(&self) -> Result<OutsideExecution, OutsideExecutionError> {
        if self.execute_after >= self.execute_before {
            return Err(OutsideExecutionError::InvalidTimeWindow {
                execute_after: self.execute_after,
                execute_before: self.execute_before,
            });
        }
        Ok(OutsideExecution {
            caller: self.caller,
            nonce: self.nonce.unwrap_or_else(random_nonce),
            execute_after: self.execute_after,
            execute_before: self.execute_before,
            calls: self.calls.clone(),
        })
    }

    /// Build, hash and sign.
    ///
    /// # Errors
    ///
    /// An invalid window is rejected before the signer is called; signer
    /// failures are returned as [`OutsideExecutionError::Signing`].
    pub async fn sign<S>(
        &self,
        signer: &S,
    ) -> Result<SignedOutsideExecution, OutsideExecutionError>
    where
        S: TransactionSigner + Sync,
    {
        let outside_execution = self.build()?;
        let message_hash = outside_execution.message_hash(
            self.version,
            self.context.chain_id,
            self.context.address,
        );
        let signature = signer
            .sign_transaction(message_hash, &outside_execution.calls)
            .await
            .map_err(OutsideExecutionError::Signing)?;
        debug!(
            message_hash = %format!("{message_hash:#x}"),
            version = ?self.version,
            calls = outside_execution.calls.len(),
            "signed outside execution"
        );
        Ok(SignedOutsideExecution {
            account: self.context.address,
            version: self.version,
            outside_execution,
            message_hash,
            signature,
        })
    }
}

/// An outside execution with the account's signature attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedOutsideExecution {
    /// Account that will run the calls.
    pub account: Felt,
    /// Interface version.
    pub version: OutsideExecutionVersion,
    /// The execution.
    pub outside_execution: OutsideExecution,
    /// Hash the signature covers.
    pub message_hash: Felt,
    /// Account signature felts.
    pub signature: Vec<Felt>,
}

impl SignedOutsideExecution {
    /// Arguments of the entry point: the execution, then the signature span.
    pub fn to_calldata(&self) -> Vec<Felt> {
        let mut felts = self.outside_execution.to_felts();
        felts.push(felt_from_len(self.signature.len()));
        felts.extend_from_slice(&self.signature);
        felts
    }

    /// The call a relayer submits to the account.
    pub fn to_call(&self) -> Call {
        Call::new(self.account, self.version.selector(), self.to_calldata())
    }
}
