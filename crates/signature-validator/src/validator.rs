use {
    crate::{
        PreSignatureFetching,
        SignatureCheck,
        SignatureValidating,
        SignatureValidationError,
        check_magic_value,
        settlement::{GPv2Settlement, IERC1271, INVALIDATED, PRE_SIGNED},
    },
    alloy::{
        primitives::Address,
        providers::DynProvider,
        transports::RpcError,
    },
    anyhow::Context,
    model::order::OrderUid,
    tracing::instrument,
};

/// Asks the signer contract whether it accepts the signature through a plain
/// `eth_call` to `isValidSignature`.
pub struct Erc1271SignatureValidator {
    provider: DynProvider,
}

impl Erc1271SignatureValidator {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait::async_trait]
impl SignatureValidating for Erc1271SignatureValidator {
    #[instrument(skip_all, fields(signer = %check.signer))]
    async fn validate_signature(
        &self,
        check: SignatureCheck,
    ) -> Result<(), SignatureValidationError> {
        let contract = IERC1271::new(check.signer, &self.provider);
        let magic_value = contract
            .isValidSignature(check.hash.into(), check.signature.into())
            .call()
            .await
            .map_err(classify_call_error)?;

        check_magic_value(magic_value.0)
    }
}

/// Reverts and undecodable results are the contract's answer and mean the
/// signature is not accepted, for example because the signer is an EOA. Any
/// other transport problem says nothing about the signature.
fn classify_call_error(err: alloy::contract::Error) -> SignatureValidationError {
    match err {
        alloy::contract::Error::TransportError(RpcError::ErrorResp(err)) => {
            tracing::debug!(?err, "isValidSignature reverted");
            SignatureValidationError::SignatureMismatch
        }
        alloy::contract::Error::TransportError(err) => {
            tracing::warn!(?err, "failed to call isValidSignature");
            SignatureValidationError::ExternalCallFailure(err.into())
        }
        err => {
            tracing::debug!(?err, "unexpected isValidSignature result");
            SignatureValidationError::SignatureMismatch
        }
    }
}

/// Reads pre-signature and invalidation state from the settlement contract.
pub struct SettlementPreSignatures {
    settlement: GPv2Settlement::GPv2SettlementInstance<DynProvider>,
}

impl SettlementPreSignatures {
    pub fn new(settlement: Address, provider: DynProvider) -> Self {
        Self {
            settlement: GPv2Settlement::new(settlement, provider),
        }
    }
}

#[async_trait::async_trait]
impl PreSignatureFetching for SettlementPreSignatures {
    #[instrument(skip_all, fields(%uid))]
    async fn is_pre_signed(&self, uid: OrderUid) -> anyhow::Result<bool> {
        let flag = self
            .settlement
            .preSignature(uid.0.to_vec().into())
            .call()
            .await
            .context("preSignature")?;
        Ok(flag == *PRE_SIGNED)
    }

    #[instrument(skip_all, fields(%uid))]
    async fn is_invalidated(&self, uid: OrderUid) -> anyhow::Result<bool> {
        let filled = self
            .settlement
            .filledAmount(uid.0.to_vec().into())
            .call()
            .await
            .context("filledAmount")?;
        Ok(filled == INVALIDATED)
    }
}
