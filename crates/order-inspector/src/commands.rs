//! The work behind each subcommand. Everything here returns a serializable
//! report so the binary only has to print it.

use {
    alloy::primitives::{Address, B256, Bytes, LogData},
    anyhow::{Context, Result},
    model::{
        DomainContext,
        aux_data::{PackedAuxData, QuoteId},
        domain::ETHFLOW_DEPLOYMENTS,
        onchain::PlacedOrder,
        order::{OrderCreation, OrderData, OrderUid},
        signature::SigningScheme,
    },
    serde::Serialize,
    signature_validator::{
        Authorization,
        AuthorizationRequest,
        Authorizer,
        PreSignatureFetching,
        SignatureValidationError,
        settlement,
    },
    std::sync::Arc,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hashes {
    pub domain_separator: B256,
    pub struct_hash: B256,
    pub digest: B256,
}

pub fn hash(order: &OrderData, domain: &DomainContext) -> Hashes {
    Hashes {
        domain_separator: B256::new(domain.separator().0),
        struct_hash: B256::new(order.hash_struct()),
        digest: order.digest(domain),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Uid {
    pub uid: OrderUid,
}

pub fn uid(order: &OrderData, owner: Address, domain: &DomainContext) -> Uid {
    Uid {
        uid: order.uid(domain, &owner),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UidParts {
    pub digest: B256,
    pub owner: Address,
    pub valid_to: u32,
}

pub fn decode_uid(uid: &OrderUid) -> UidParts {
    let (digest, owner, valid_to) = uid.parts();
    UidParts {
        digest,
        owner,
        valid_to,
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxData {
    pub quote_id: QuoteId,
    pub valid_to: u32,
}

pub fn decode_aux(aux_data: &PackedAuxData) -> AuxData {
    AuxData {
        quote_id: aux_data.quote_id,
        valid_to: aux_data.valid_to,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub uid: OrderUid,
    pub owner: Address,
    pub sender: Address,
    pub signing_scheme: SigningScheme,
    /// Whether the order is owned by the chain's ETH-flow contract.
    pub ethflow: bool,
    pub order: OrderData,
    /// Present when the extra data is a packed ETH-flow blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux_data: Option<AuxData>,
}

pub fn decode_placement(
    topics: Vec<B256>,
    data: Bytes,
    domain: &DomainContext,
) -> Result<Placement> {
    let log = LogData::new(topics, data).context("a log has at most 4 topics")?;
    let placed = PlacedOrder::from_log(&log, domain)
        .context("log is not a valid OrderPlacement event")?;
    let aux_data = match placed.packed_aux_data() {
        Ok(aux_data) => Some(decode_aux(&aux_data)),
        Err(err) => {
            tracing::debug!(?err, "extra data is not packed aux data");
            None
        }
    };
    Ok(Placement {
        uid: placed.uid,
        owner: placed.owner,
        sender: placed.sender,
        signing_scheme: placed.signature.scheme(),
        ethflow: ETHFLOW_DEPLOYMENTS.get(&domain.chain_id()) == Some(&placed.owner),
        order: placed.data,
        aux_data,
    })
}

/// A transaction the order owner has to send to the settlement contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallData {
    pub to: Address,
    pub data: Bytes,
}

pub fn pre_sign_call_data(uid: &OrderUid, signed: bool, domain: &DomainContext) -> CallData {
    CallData {
        to: domain.settlement_contract(),
        data: settlement::set_pre_signature(uid, signed).into(),
    }
}

pub fn invalidate_call_data(uid: &OrderUid, domain: &DomainContext) -> CallData {
    CallData {
        to: domain.settlement_contract(),
        data: settlement::invalidate_order(uid).into(),
    }
}

/// Chain state access needed to verify EIP-1271 and pre-signed orders.
pub struct ChainAccess {
    pub authorizer: Authorizer,
    pub pre_signatures: Arc<dyn PreSignatureFetching>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Authorized,
    PresignaturePending,
    /// Authorized, but the owner cancelled the order on chain.
    Invalidated,
    Rejected,
    /// The scheme needs chain state and no node was configured.
    Unchecked,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub status: Status,
    pub signing_scheme: SigningScheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<OrderUid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verification {
    fn rejected(scheme: SigningScheme, owner: Option<Address>, reason: String) -> Self {
        Self {
            status: Status::Rejected,
            signing_scheme: scheme,
            owner,
            uid: None,
            reason: Some(reason),
        }
    }
}

/// Checks an order creation the way an order book would before accepting
/// it. Failing node calls are errors since they say nothing about the order.
pub async fn verify(
    order: &OrderCreation,
    domain: &DomainContext,
    chain: Option<&ChainAccess>,
) -> Result<Verification> {
    let scheme = order.signature.scheme();
    if let Err(err) = order.data.validate() {
        return Ok(Verification::rejected(scheme, order.from, err.to_string()));
    }
    let owner = match order.verify_owner(domain.separator()) {
        Ok(owner) => owner,
        Err(err) => {
            return Ok(Verification::rejected(scheme, order.from, err.to_string()));
        }
    };
    let uid = order.data.uid(domain, &owner);

    let status = match chain {
        Some(chain) => {
            let request = AuthorizationRequest {
                order: order.data,
                owner,
                signature: order.signature.clone(),
            };
            match chain.authorizer.authorize(&request).await {
                Ok(authorization) => {
                    let invalidated = chain
                        .pre_signatures
                        .is_invalidated(uid)
                        .await
                        .context("failed to read order invalidation")?;
                    match (authorization, invalidated) {
                        (_, true) => Status::Invalidated,
                        (Authorization::Authorized, false) => Status::Authorized,
                        (Authorization::PresignaturePending, false) => {
                            Status::PresignaturePending
                        }
                    }
                }
                Err(SignatureValidationError::SignatureMismatch) => {
                    return Ok(Verification::rejected(
                        scheme,
                        Some(owner),
                        SignatureValidationError::SignatureMismatch.to_string(),
                    ));
                }
                Err(err @ SignatureValidationError::ExternalCallFailure(_)) => {
                    return Err(err).context("failed to verify signature");
                }
            }
        }
        None if scheme.is_ecdsa_scheme() => Status::Authorized,
        None => Status::Unchecked,
    };
    tracing::info!(%uid, ?status, "verified order");

    Ok(Verification {
        status,
        signing_scheme: scheme,
        owner: Some(owner),
        uid: Some(uid),
        reason: None,
    })
}
