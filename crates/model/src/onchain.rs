//! Orders as the settlement contract and the on-chain order contracts see
//! them: a positional `GPv2Order.Data` tuple whose enums are hashed labels.

use {
    crate::{
        DomainContext,
        app_id::AppId,
        aux_data::{AuxDataError, PackedAuxData},
        order::{BuyTokenDestination, OrderData, OrderKind, OrderUid, SellTokenSource},
        signature::Signature,
        tag::{Balance, ExternalBuyTokenDestination},
    },
    alloy_primitives::{Address, B256, Bytes, LogData},
    alloy_sol_types::{SolEvent, sol},
};

sol! {
    /// `GPv2Order.Data`
    #[derive(Debug, PartialEq, Eq)]
    struct OnchainOrder {
        address sellToken;
        address buyToken;
        address receiver;
        uint256 sellAmount;
        uint256 buyAmount;
        uint32 validTo;
        bytes32 appData;
        uint256 feeAmount;
        bytes32 kind;
        bool partiallyFillable;
        bytes32 sellTokenBalance;
        bytes32 buyTokenBalance;
    }

    /// `ICoWSwapOnchainOrders.OnchainSignature`
    #[derive(Debug, PartialEq, Eq)]
    struct OnchainSignature {
        uint8 scheme;
        bytes data;
    }

    #[derive(Debug, PartialEq, Eq)]
    event OrderPlacement(
        address indexed sender,
        OnchainOrder order,
        OnchainSignature signature,
        bytes data
    );
}

/// Tuple positions of the hashed enum fields.
pub mod position {
    pub const KIND: usize = 8;
    pub const SELL_TOKEN_BALANCE: usize = 10;
    pub const BUY_TOKEN_BALANCE: usize = 11;
}

#[derive(Debug, thiserror::Error)]
pub enum OnchainError {
    #[error("unknown tag {value} at tuple position {position}")]
    UnknownTag { position: usize, value: B256 },
    #[error("invalid balance configuration: {0}")]
    InvalidBalanceConfiguration(#[from] ExternalBuyTokenDestination),
    #[error("unknown on-chain signing scheme {0}")]
    UnknownSigningScheme(u8),
    #[error("EIP-1271 signature data must start with the owner but is {0} bytes long")]
    MissingEip1271Owner(usize),
    #[error("malformed order placement event")]
    Event(#[from] alloy_sol_types::Error),
}

fn balance_at(position: usize, tag: &B256) -> Result<Balance, OnchainError> {
    Balance::from_tag(&tag.0).ok_or(OnchainError::UnknownTag {
        position,
        value: *tag,
    })
}

impl OrderData {
    pub fn from_onchain(order: &OnchainOrder) -> Result<Self, OnchainError> {
        let kind = OrderKind::from_tag(&order.kind.0).ok_or(OnchainError::UnknownTag {
            position: position::KIND,
            value: order.kind,
        })?;
        let sell_token_balance: SellTokenSource =
            balance_at(position::SELL_TOKEN_BALANCE, &order.sellTokenBalance)?.into();
        let buy_token_balance: BuyTokenDestination =
            balance_at(position::BUY_TOKEN_BALANCE, &order.buyTokenBalance)?.try_into()?;

        Ok(Self {
            sell_token: order.sellToken,
            buy_token: order.buyToken,
            receiver: Some(order.receiver).filter(|receiver| !receiver.is_zero()),
            sell_amount: order.sellAmount,
            buy_amount: order.buyAmount,
            valid_to: order.validTo,
            app_data: AppId::from(order.appData),
            fee_amount: order.feeAmount,
            kind,
            partially_fillable: order.partiallyFillable,
            sell_token_balance,
            buy_token_balance,
        })
    }

    pub fn to_onchain(&self) -> OnchainOrder {
        OnchainOrder {
            sellToken: self.sell_token,
            buyToken: self.buy_token,
            receiver: self.receiver.unwrap_or_default(),
            sellAmount: self.sell_amount,
            buyAmount: self.buy_amount,
            validTo: self.valid_to,
            appData: self.app_data.into(),
            feeAmount: self.fee_amount,
            kind: B256::new(self.kind.tag()),
            partiallyFillable: self.partially_fillable,
            sellTokenBalance: B256::new(self.sell_token_balance.tag()),
            buyTokenBalance: B256::new(self.buy_token_balance.tag()),
        }
    }
}

impl OnchainSignature {
    /// Resolves the order owner and the signature the order is verified with.
    ///
    /// Only two schemes exist on chain: `0` for EIP-1271, where the signature
    /// data is prefixed with the owner, and `1` for pre-signed orders owned by
    /// the sender of the placement.
    pub fn resolve(&self, sender: Address) -> Result<(Address, Signature), OnchainError> {
        match self.scheme {
            0 => {
                if self.data.len() < 20 {
                    return Err(OnchainError::MissingEip1271Owner(self.data.len()));
                }
                let (owner, signature) = self.data.split_at(20);
                Ok((
                    Address::from_slice(owner),
                    Signature::Eip1271(signature.to_vec()),
                ))
            }
            1 => Ok((sender, Signature::PreSign)),
            scheme => Err(OnchainError::UnknownSigningScheme(scheme)),
        }
    }
}

/// An order reconstructed from an `OrderPlacement` event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlacedOrder {
    pub data: OrderData,
    pub owner: Address,
    pub sender: Address,
    pub signature: Signature,
    pub uid: OrderUid,
    /// Extra bytes the placing contract attached to the event.
    pub extra_data: Bytes,
}

impl PlacedOrder {
    pub fn from_event(
        event: &OrderPlacement,
        domain: &DomainContext,
    ) -> Result<Self, OnchainError> {
        let data = OrderData::from_onchain(&event.order)?;
        let (owner, signature) = event.signature.resolve(event.sender)?;
        Ok(Self {
            uid: data.uid(domain, &owner),
            data,
            owner,
            sender: event.sender,
            signature,
            extra_data: event.data.clone(),
        })
    }

    pub fn from_log(log: &LogData, domain: &DomainContext) -> Result<Self, OnchainError> {
        let event = OrderPlacement::decode_log_data(log)?;
        Self::from_event(&event, domain)
    }

    /// ETH-flow placements carry the quote and the user's real expiry in the
    /// extra data.
    pub fn packed_aux_data(&self) -> Result<PackedAuxData, AuxDataError> {
        PackedAuxData::decode(&self.extra_data)
    }
}
