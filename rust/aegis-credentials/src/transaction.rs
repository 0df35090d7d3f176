//! The signing seam shared by every way of authorizing account calls.

use crate::{AggregateSigner, MultisigSigner};
use aegis_typed_data::Call;
use starknet_types_core::felt::Felt;
use std::future::Future;

/// Produces the account signature for a transaction or typed-data hash.
///
/// Plain and multisig aggregates ignore `calls`; session signers use them to
/// select Merkle proofs and to let the guardian inspect what it co-signs.
/// Concrete failures travel as the source of the [`signature::Error`].
pub trait TransactionSigner {
    /// Account signature felts for `tx_hash`.
    fn sign_transaction(
        &self,
        tx_hash: Felt,
        calls: &[Call],
    ) -> impl Future<Output = Result<Vec<Felt>, signature::Error>> + Send;
}

impl TransactionSigner for AggregateSigner {
    async fn sign_transaction(
        &self,
        tx_hash: Felt,
        _calls: &[Call],
    ) -> Result<Vec<Felt>, signature::Error> {
        self.sign_raw(tx_hash)
            .await
            .map_err(signature::Error::from_source)
    }
}

impl TransactionSigner for MultisigSigner {
    async fn sign_transaction(
        &self,
        tx_hash: Felt,
        _calls: &[Call],
    ) -> Result<Vec<Felt>, signature::Error> {
        self.sign_raw(tx_hash)
            .await
            .map_err(signature::Error::from_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SignerError, StarknetSigner};
    use std::error::Error as _;

    #[tokio::test]
    async fn it_signs_through_the_seam() {
        let signer = AggregateSigner::single(StarknetSigner::random());
        let felts = signer.sign_transaction(Felt::THREE, &[]).await.unwrap();
        assert_eq!(felts[0], Felt::ONE);
    }

    #[tokio::test]
    async fn it_carries_the_concrete_error_as_source() {
        let signer = StarknetSigner::from_private_key(Felt::ONE).unwrap();
        let aggregate = AggregateSigner::single(signer);
        // Larger than 2^251: outside the range the Stark curve signs.
        let hash = Felt::MAX;
        let error = aggregate.sign_transaction(hash, &[]).await.unwrap_err();
        let source = error.source().and_then(|s| s.downcast_ref::<SignerError>());
        assert!(matches!(source, Some(SignerError::Signing(_))));
    }
}
