//! Combining several signers into one account signature.

use crate::{Signer, SignerError, SignerIdentity, SignerSignature};
use aegis_typed_data::felt_from_len;
use starknet_types_core::felt::Felt;
use std::collections::HashSet;
use tracing::debug;

/// An ordered, duplicate-free list of signers.
///
/// Signs with every member in list order and emits
/// `[count, signature_1..., signature_2..., ...]`.
#[derive(Debug, Clone)]
pub struct AggregateSigner {
    signers: Vec<Signer>,
}

impl AggregateSigner {
    /// Aggregate over `signers`, in the given order.
    ///
    /// # Errors
    ///
    /// Fails for an empty list or a list where two signers share a GUID.
    pub fn new(signers: Vec<Signer>) -> Result<Self, SignerError> {
        if signers.is_empty() {
            return Err(SignerError::NoSigners);
        }
        let mut seen = HashSet::with_capacity(signers.len());
        for signer in &signers {
            let guid = signer.guid();
            if !seen.insert(guid) {
                return Err(SignerError::DuplicateSigner(guid));
            }
        }
        Ok(Self { signers })
    }

    /// Aggregate of a single signer.
    pub fn single(signer: impl Into<Signer>) -> Self {
        Self {
            signers: vec![signer.into()],
        }
    }

    /// Members in signing order.
    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    /// Member identities in signing order.
    pub fn identities(&self) -> Vec<SignerIdentity> {
        self.signers.iter().map(Signer::identity).collect()
    }

    /// Sign with every member.
    ///
    /// # Errors
    ///
    /// The first member failure aborts the whole signature.
    pub async fn sign(&self, message_hash: Felt) -> Result<Vec<SignerSignature>, SignerError> {
        let mut signatures = Vec::with_capacity(self.signers.len());
        for signer in &self.signers {
            signatures.push(signer.sign_raw(message_hash).await?);
        }
        Ok(signatures)
    }

    /// Sign with every member and serialize the result.
    ///
    /// # Errors
    ///
    /// See [`AggregateSigner::sign`].
    pub async fn sign_raw(&self, message_hash: Felt) -> Result<Vec<Felt>, SignerError> {
        let signatures = self.sign(message_hash).await?;
        debug!(count = signatures.len(), "aggregated signatures");
        Ok(compile_signatures(&signatures))
    }
}

/// `[count, signature_1..., signature_2..., ...]`.
pub fn compile_signatures(signatures: &[SignerSignature]) -> Vec<Felt> {
    let mut felts = vec![felt_from_len(signatures.len())];
    for signature in signatures {
        felts.extend(signature.to_felts());
    }
    felts
}

/// Sort signers by ascending GUID, the order a multisig account requires.
pub fn sort_by_guid(signers: &mut [Signer]) {
    signers.sort_by_cached_key(Signer::guid);
}

/// Check that identities are in strictly ascending GUID order.
///
/// # Errors
///
/// [`SignerError::SignaturesNotSorted`] on the first pair out of order or
/// equal.
pub fn ensure_sorted(identities: &[SignerIdentity]) -> Result<(), SignerError> {
    let guids: Vec<Felt> = identities.iter().map(SignerIdentity::guid).collect();
    if guids.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(SignerError::SignaturesNotSorted)
    }
}

/// Signer for a multisig account: an aggregate whose members are strictly
/// ascending by GUID.
#[derive(Debug, Clone)]
pub struct MultisigSigner {
    inner: AggregateSigner,
}

impl MultisigSigner {
    /// Multisig over `signers`, which must already be sorted.
    ///
    /// # Errors
    ///
    /// [`SignerError::SignaturesNotSorted`] if the GUIDs are not strictly
    /// ascending, which includes duplicates; [`SignerError::NoSigners`] for an
    /// empty list.
    pub fn new(signers: Vec<Signer>) -> Result<Self, SignerError> {
        let identities: Vec<SignerIdentity> = signers.iter().map(Signer::identity).collect();
        ensure_sorted(&identities)?;
        Ok(Self {
            inner: AggregateSigner::new(signers)?,
        })
    }

    /// Multisig over `signers` in whatever order they come, sorted first.
    ///
    /// # Errors
    ///
    /// See [`MultisigSigner::new`]; only duplicates and empty lists remain.
    pub fn sorted(mut signers: Vec<Signer>) -> Result<Self, SignerError> {
        sort_by_guid(&mut signers);
        Self::new(signers)
    }

    /// Members in signing order.
    pub fn signers(&self) -> &[Signer] {
        self.inner.signers()
    }

    /// Sign with every member.
    ///
    /// # Errors
    ///
    /// See [`AggregateSigner::sign`].
    pub async fn sign(&self, message_hash: Felt) -> Result<Vec<SignerSignature>, SignerError> {
        self.inner.sign(message_hash).await
    }

    /// Sign with every member and serialize the result.
    ///
    /// # Errors
    ///
    /// See [`AggregateSigner::sign`].
    pub async fn sign_raw(&self, message_hash: Felt) -> Result<Vec<Felt>, SignerError> {
        self.inner.sign_raw(message_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StarknetSigner;

    fn signer(key: u64) -> Signer {
        StarknetSigner::from_private_key(Felt::from(key))
            .unwrap()
            .into()
    }

    #[test]
    fn it_rejects_empty_and_duplicate_lists() {
        assert!(matches!(
            AggregateSigner::new(vec![]),
            Err(SignerError::NoSigners)
        ));
        let duplicate = signer(1);
        assert_eq!(
            AggregateSigner::new(vec![duplicate.clone(), signer(2), duplicate.clone()]).err(),
            Some(SignerError::DuplicateSigner(duplicate.guid()))
        );
    }

    #[test]
    fn it_keeps_caller_order_for_plain_aggregates() {
        let mut signers = vec![signer(1), signer(2)];
        sort_by_guid(&mut signers);
        signers.reverse();
        let aggregate = AggregateSigner::new(signers.clone()).unwrap();
        assert_eq!(aggregate.identities()[0], signers[0].identity());
    }

    #[tokio::test]
    async fn it_prefixes_signatures_with_their_count() {
        let aggregate = AggregateSigner::new(vec![signer(1), signer(2)]).unwrap();
        let felts = aggregate.sign_raw(Felt::ONE).await.unwrap();
        assert_eq!(felts.len(), 1 + 4 + 4);
        assert_eq!(felts[0], Felt::TWO);
        assert_eq!(felts[1], Felt::ZERO);
        assert_eq!(felts[5], Felt::ZERO);
    }

    #[test]
    fn it_treats_duplicates_as_unsorted_for_multisig() {
        let duplicate = signer(3);
        assert_eq!(
            MultisigSigner::new(vec![duplicate.clone(), duplicate]).err(),
            Some(SignerError::SignaturesNotSorted)
        );
    }

    #[test]
    fn it_sorts_into_a_valid_multisig() {
        let multisig = MultisigSigner::sorted(vec![signer(5), signer(6), signer(7)]).unwrap();
        let identities: Vec<_> = multisig.signers().iter().map(Signer::identity).collect();
        assert!(ensure_sorted(&identities).is_ok());
    }
}
