//! Checks that a signature authorizes an order under its declared signing
//! scheme. Schemes that can be checked locally are; the others are delegated
//! to chain state through the traits in this crate.

pub mod authorization;
pub mod settlement;
mod validator;

pub use {
    authorization::{Authorization, AuthorizationRequest, Authorizer},
    validator::{Erc1271SignatureValidator, SettlementPreSignatures},
};
use {
    alloy::primitives::Address,
    hex_literal::hex,
    model::order::OrderUid,
    thiserror::Error,
};

/// The magic value as defined by EIP-1271.
pub const MAGIC_VALUE: [u8; 4] = hex!("1626ba7e");

/// Structure used to represent a signature.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureCheck {
    pub signer: Address,
    pub hash: [u8; 32],
    pub signature: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum SignatureValidationError {
    /// The signature does not authorize the order under the declared scheme.
    ///
    /// Either ECDSA recovery yielded another address, or the owner's contract
    /// reverted or did not return the magic value.
    #[error("signature does not match the order owner")]
    SignatureMismatch,
    /// The node could not answer the query. The signature may well be valid.
    #[error("external call failed: {0:#}")]
    ExternalCallFailure(#[source] anyhow::Error),
}

#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
/// <https://eips.ethereum.org/EIPS/eip-1271>
pub trait SignatureValidating: Send + Sync {
    async fn validate_signature(
        &self,
        check: SignatureCheck,
    ) -> Result<(), SignatureValidationError>;
}

/// Read access to the order state kept by the settlement contract.
///
/// Answers are snapshots: a flag may flip right after it was read, so a
/// positive answer is advisory and not a lock.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait PreSignatureFetching: Send + Sync {
    /// Whether the owner set the pre-signature flag for the order.
    async fn is_pre_signed(&self, uid: OrderUid) -> anyhow::Result<bool>;

    /// Whether the owner permanently cancelled the order on chain.
    async fn is_invalidated(&self, uid: OrderUid) -> anyhow::Result<bool>;
}

/// Interprets the value an `isValidSignature` call returned.
pub fn check_magic_value(value: [u8; 4]) -> Result<(), SignatureValidationError> {
    if value == MAGIC_VALUE {
        Ok(())
    } else {
        tracing::debug!(value = %alloy::primitives::hex::encode(value), "unexpected isValidSignature result");
        Err(SignatureValidationError::SignatureMismatch)
    }
}
