//! Outside execution ([SNIP-9]) for a Starknet account.
//!
//! An outside execution is a batch of calls the account agrees to run when
//! a third party submits it, optionally only a specific caller, inside a
//! time window and at most once per nonce. The account owner signs the
//! typed data hash; a relayer then calls `execute_from_outside_v2` (or the
//! legacy `execute_from_outside`) with the payload and signature.
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use aegis_credentials::{AggregateSigner, StarknetSigner};
//! use aegis_outside_execution::{OutsideExecutionBuilder, OutsideExecutionVersion};
//! use aegis_typed_data::{AccountContext, Call, context::sepolia, selector};
//! use starknet_types_core::felt::Felt;
//!
//! let owner = AggregateSigner::single(StarknetSigner::random());
//! let context = AccountContext::new(sepolia(), Felt::from(0x1234u64));
//! let signed = OutsideExecutionBuilder::new(context, OutsideExecutionVersion::V2)
//!     .window(0, 1_900_000_000)
//!     .call(Call::new(Felt::from(0x49du64), selector("transfer"), vec![]))
//!     .sign(&owner)
//!     .await?;
//! let relayed = signed.to_call();
//! # Ok(())
//! # }
//! ```
//!
//! [SNIP-9]: https://github.com/starknet-io/SNIPs/blob/main/SNIPS/snip-9.md

#![warn(missing_docs)]

mod builder;
mod error;
mod execution;

pub use builder::{OutsideExecutionBuilder, SignedOutsideExecution, random_nonce};
pub use error::OutsideExecutionError;
pub use execution::{
    CALL_TYPE_V2, DOMAIN_NAME, OUTSIDE_CALL_TYPE_V1, OUTSIDE_EXECUTION_TYPE_V1,
    OUTSIDE_EXECUTION_TYPE_V2, OutsideExecution, OutsideExecutionVersion, any_caller, call_hash,
};
