use aegis_credentials::{AggregateSigner, SignerSignature, StarknetSigner, TransactionSigner};
use aegis_outside_execution::{
    OutsideExecutionBuilder, OutsideExecutionError, OutsideExecutionVersion, any_caller,
};
use aegis_session::{
    AllowedMethod, LocalGuardian, OffChainSession, SessionError, SessionGrant, SessionSigner,
    session_magic,
};
use aegis_typed_data::{AccountContext, Call, context::sepolia, selector};
use pretty_assertions::assert_eq;
use starknet_types_core::felt::Felt;
use std::error::Error as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use testresult::TestResult;

const ACCOUNT: u64 = 0xacc;
const TOKEN: u64 = 0x49d;

fn context() -> AccountContext {
    AccountContext::new(sepolia(), Felt::from(ACCOUNT))
}

fn transfer() -> Call {
    Call::new(
        Felt::from(TOKEN),
        selector("transfer"),
        vec![Felt::from(0xbeefu64), Felt::from(5u64), Felt::ZERO],
    )
}

fn builder(version: OutsideExecutionVersion) -> OutsideExecutionBuilder {
    OutsideExecutionBuilder::new(context(), version)
        .nonce(Felt::from(0x1234u64))
        .window(100, 200)
        .call(transfer())
}

#[tokio::test]
async fn it_lays_out_execute_from_outside_calldata() -> TestResult {
    let owner = StarknetSigner::random();
    let signer = AggregateSigner::single(owner.clone());
    let signed = builder(OutsideExecutionVersion::V2).sign(&signer).await?;

    let mut expected = vec![
        any_caller(),
        Felt::from(0x1234u64),
        Felt::from(100u64),
        Felt::from(200u64),
        Felt::ONE,
    ];
    expected.extend(transfer().to_felts());
    expected.push(Felt::from(5u64));
    expected.extend(&signed.signature);
    assert_eq!(signed.to_calldata(), expected);

    let call = signed.to_call();
    assert_eq!(call.to, Felt::from(ACCOUNT));
    assert_eq!(call.selector, selector("execute_from_outside_v2"));

    // [count, variant, pubkey, r, s]
    assert_eq!(signed.signature[0], Felt::ONE);
    let signature = SignerSignature::Starknet {
        pubkey: signed.signature[2],
        r: signed.signature[3],
        s: signed.signature[4],
    };
    assert_eq!(signature.identity(), owner.identity());
    assert!(signature.verify(signed.message_hash));
    Ok(())
}

#[tokio::test]
async fn it_hashes_each_version_under_its_own_domain() -> TestResult {
    let signer = AggregateSigner::single(StarknetSigner::random());
    let v1 = builder(OutsideExecutionVersion::V1).sign(&signer).await?;
    let v2 = builder(OutsideExecutionVersion::V2).sign(&signer).await?;
    assert_eq!(v1.outside_execution, v2.outside_execution);
    assert_ne!(v1.message_hash, v2.message_hash);
    assert_eq!(
        v1.message_hash,
        v1.outside_execution
            .message_hash(OutsideExecutionVersion::V1, sepolia(), Felt::from(ACCOUNT))
    );
    assert_eq!(v1.to_call().selector, selector("execute_from_outside"));
    Ok(())
}

struct Counting(AtomicUsize);

impl TransactionSigner for Counting {
    async fn sign_transaction(
        &self,
        _tx_hash: Felt,
        _calls: &[Call],
    ) -> Result<Vec<Felt>, signature::Error> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }
}

#[tokio::test]
async fn it_rejects_an_empty_window_before_signing() {
    let signer = Counting(AtomicUsize::new(0));
    let result = builder(OutsideExecutionVersion::V2)
        .window(200, 200)
        .sign(&signer)
        .await;
    assert!(matches!(
        result,
        Err(OutsideExecutionError::InvalidTimeWindow {
            execute_after: 200,
            execute_before: 200
        })
    ));
    assert_eq!(signer.0.load(Ordering::SeqCst), 0);
}

async fn session_signer() -> SessionSigner {
    let owner = AggregateSigner::single(StarknetSigner::random());
    let session_key = StarknetSigner::random();
    let guardian = StarknetSigner::random();
    let session = OffChainSession::new(
        1_900_000_000,
        vec![AllowedMethod::new(Felt::from(TOKEN), selector("transfer"))],
        "",
        session_key.identity().guid(),
    )
    .unwrap();
    let grant = SessionGrant::authorize(session, &context(), &owner)
        .await
        .unwrap();
    let guardian = Arc::new(LocalGuardian::new(guardian, context()));
    SessionSigner::new(grant, session_key, guardian).unwrap()
}

#[tokio::test]
async fn it_signs_with_a_session_key() -> TestResult {
    let signer = session_signer().await;
    let signed = builder(OutsideExecutionVersion::V2).sign(&signer).await?;
    assert_eq!(signed.signature[0], session_magic());
    Ok(())
}

#[tokio::test]
async fn it_reports_signer_failures_with_their_source() {
    let signer = session_signer().await;
    let outside_grant = Call::new(Felt::from(0xdeadu64), selector("approve"), vec![]);
    let error = builder(OutsideExecutionVersion::V2)
        .call(outside_grant)
        .sign(&signer)
        .await
        .unwrap_err();
    let OutsideExecutionError::Signing(source) = &error else {
        panic!("expected a signing error, got {error:?}");
    };
    let session_error = source
        .source()
        .and_then(|source| source.downcast_ref::<SessionError>());
    assert!(matches!(session_error, Some(SessionError::CallNotInGrant { .. })));
}
