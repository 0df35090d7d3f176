use aegis_credentials::{
    AggregateSigner, MultisigSigner, Secp256k1Signer, Secp256r1Signer, Signer, SignerError,
    StarknetSigner, sort_by_guid,
};
use starknet_types_core::felt::Felt;

fn signers() -> Vec<Signer> {
    vec![
        StarknetSigner::from_private_key(Felt::from(0x11u64))
            .unwrap()
            .into(),
        Secp256k1Signer::from_bytes(&[0x22; 32]).unwrap().into(),
        Secp256r1Signer::from_bytes(&[0x33; 32]).unwrap().into(),
    ]
}

fn permutations(items: &[Signer]) -> Vec<Vec<Signer>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for index in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(index);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[test]
fn only_the_ascending_permutation_is_accepted() {
    let mut sorted = signers();
    sort_by_guid(&mut sorted);
    let expected: Vec<Felt> = sorted.iter().map(Signer::guid).collect();

    let mut accepted = 0;
    for permutation in permutations(&signers()) {
        let guids: Vec<Felt> = permutation.iter().map(Signer::guid).collect();
        match MultisigSigner::new(permutation) {
            Ok(_) => {
                accepted += 1;
                assert_eq!(guids, expected);
            }
            Err(error) => assert_eq!(error, SignerError::SignaturesNotSorted),
        }
    }
    assert_eq!(accepted, 1);
}

#[test]
fn plain_aggregates_accept_any_order() {
    for permutation in permutations(&signers()) {
        assert!(AggregateSigner::new(permutation).is_ok());
    }
}

#[test]
fn pairs_are_accepted_in_one_order_only() {
    let mut pair = signers();
    pair.truncate(2);
    sort_by_guid(&mut pair);
    assert!(MultisigSigner::new(pair.clone()).is_ok());
    pair.reverse();
    assert_eq!(
        MultisigSigner::new(pair).err(),
        Some(SignerError::SignaturesNotSorted)
    );
}

#[tokio::test]
async fn multisig_signatures_follow_guid_order() {
    let multisig = MultisigSigner::sorted(signers()).unwrap();
    let signatures = multisig.sign(Felt::from(77u64)).await.unwrap();
    let guids: Vec<Felt> = signatures.iter().map(|s| s.guid()).collect();
    let expected: Vec<Felt> = multisig.signers().iter().map(Signer::guid).collect();
    assert_eq!(guids, expected);
    assert!(signatures.iter().all(|s| s.verify(Felt::from(77u64))));
}
