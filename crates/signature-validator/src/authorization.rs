//! Dispatch over the closed set of signing schemes.
//!
//! Every scheme answers the same question for a digest and its evidence:
//! does the owner authorize this exact order? A rejection is final for the
//! order; a changed order is a different order with a different UID.

use {
    crate::{
        PreSignatureFetching,
        SignatureCheck,
        SignatureValidating,
        SignatureValidationError,
    },
    alloy::primitives::Address,
    futures::future,
    model::{
        DomainContext,
        order::{OrderData, OrderUid},
        signature::Signature,
    },
    std::sync::Arc,
    tracing::instrument,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Authorization {
    Authorized,
    /// The order uses a pre-signature that the owner has not set yet. This
    /// may change once the owner sends the `setPreSignature` transaction.
    PresignaturePending,
}

/// An order, the address that claims to own it and the evidence for that
/// claim.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthorizationRequest {
    pub order: OrderData,
    pub owner: Address,
    pub signature: Signature,
}

impl AuthorizationRequest {
    pub fn uid(&self, domain: &DomainContext) -> OrderUid {
        self.order.uid(domain, &self.owner)
    }
}

pub struct Authorizer {
    domain: DomainContext,
    contract_signatures: Arc<dyn SignatureValidating>,
    pre_signatures: Arc<dyn PreSignatureFetching>,
}

impl Authorizer {
    pub fn new(
        domain: DomainContext,
        contract_signatures: Arc<dyn SignatureValidating>,
        pre_signatures: Arc<dyn PreSignatureFetching>,
    ) -> Self {
        Self {
            domain,
            contract_signatures,
            pre_signatures,
        }
    }

    #[instrument(skip_all, fields(owner = %request.owner, scheme = ?request.signature.scheme()))]
    pub async fn authorize(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Authorization, SignatureValidationError> {
        let struct_hash = request.order.hash_struct();
        match &request.signature {
            Signature::Eip712(_) | Signature::EthSign(_) => {
                let recovered = request
                    .signature
                    .verify_owner(Some(request.owner), self.domain.separator(), &struct_hash);
                match recovered {
                    Ok(_) => Ok(Authorization::Authorized),
                    Err(err) => {
                        tracing::debug!(?err, "ECDSA signature rejected");
                        Err(SignatureValidationError::SignatureMismatch)
                    }
                }
            }
            Signature::Eip1271(signature) => {
                let check = SignatureCheck {
                    signer: request.owner,
                    hash: request.order.digest(&self.domain).0,
                    signature: signature.clone(),
                };
                self.contract_signatures.validate_signature(check).await?;
                Ok(Authorization::Authorized)
            }
            Signature::PreSign => {
                let uid = request.uid(&self.domain);
                let pre_signed = self
                    .pre_signatures
                    .is_pre_signed(uid)
                    .await
                    .map_err(SignatureValidationError::ExternalCallFailure)?;
                Ok(if pre_signed {
                    Authorization::Authorized
                } else {
                    Authorization::PresignaturePending
                })
            }
        }
    }

    /// Authorizes independent orders concurrently. Results are in request
    /// order.
    pub async fn authorize_all(
        &self,
        requests: &[AuthorizationRequest],
    ) -> Vec<Result<Authorization, SignatureValidationError>> {
        future::join_all(requests.iter().map(|request| self.authorize(request))).await
    }
}
