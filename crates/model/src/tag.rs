//! The settlement contract does not encode order enums as small integers but
//! as the keccak256 hash of a lower case label. This module is the complete
//! table of those discriminators. Anything not listed here is rejected.

use {
    crate::order::{BuyTokenDestination, OrderKind, SellTokenSource},
    hex_literal::hex,
};

// keccak256("sell")
pub const KIND_SELL: [u8; 32] =
    hex!("f3b277728b3fee749481eb3e0b3b48980dbbab78658fc419025cb16eee346775");
// keccak256("buy")
pub const KIND_BUY: [u8; 32] =
    hex!("6ed88e868af0a1983e3886d5f3e95a2fafbd6c3450bc229e27342283dc429ccc");
// keccak256("erc20")
pub const BALANCE_ERC20: [u8; 32] =
    hex!("5a28e9363bb942b639270062aa6bb295f434bcdfc42c97267bf003f272060dc9");
// keccak256("external")
pub const BALANCE_EXTERNAL: [u8; 32] =
    hex!("abee3b73373acd583a130924aad6dc38cfdc44ba0555ba94ce2ff63980ea0632");
// keccak256("internal")
pub const BALANCE_INTERNAL: [u8; 32] =
    hex!("4ac99ace14ee0a5ef932dc609df0943ab7ac16b7583634612f8dc35a4289a6ce");

/// Where token balances are taken from or paid to, before knowing which side
/// of the trade the tag was found on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Balance {
    Erc20,
    Internal,
    External,
}

impl Balance {
    pub const fn tag(self) -> [u8; 32] {
        match self {
            Self::Erc20 => BALANCE_ERC20,
            Self::Internal => BALANCE_INTERNAL,
            Self::External => BALANCE_EXTERNAL,
        }
    }

    pub fn from_tag(tag: &[u8; 32]) -> Option<Self> {
        match *tag {
            BALANCE_ERC20 => Some(Self::Erc20),
            BALANCE_INTERNAL => Some(Self::Internal),
            BALANCE_EXTERNAL => Some(Self::External),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Erc20 => "erc20",
            Self::Internal => "internal",
            Self::External => "external",
        }
    }
}

impl OrderKind {
    pub const fn tag(self) -> [u8; 32] {
        match self {
            Self::Sell => KIND_SELL,
            Self::Buy => KIND_BUY,
        }
    }

    pub fn from_tag(tag: &[u8; 32]) -> Option<Self> {
        match *tag {
            KIND_SELL => Some(Self::Sell),
            KIND_BUY => Some(Self::Buy),
            _ => None,
        }
    }
}

impl From<SellTokenSource> for Balance {
    fn from(source: SellTokenSource) -> Self {
        match source {
            SellTokenSource::Erc20 => Self::Erc20,
            SellTokenSource::Internal => Self::Internal,
            SellTokenSource::External => Self::External,
        }
    }
}

impl From<Balance> for SellTokenSource {
    fn from(balance: Balance) -> Self {
        match balance {
            Balance::Erc20 => Self::Erc20,
            Balance::Internal => Self::Internal,
            Balance::External => Self::External,
        }
    }
}

impl From<BuyTokenDestination> for Balance {
    fn from(destination: BuyTokenDestination) -> Self {
        match destination {
            BuyTokenDestination::Erc20 => Self::Erc20,
            BuyTokenDestination::Internal => Self::Internal,
        }
    }
}

/// Proceeds can not be paid out to an external Vault balance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("external balances are only supported for the sell token")]
pub struct ExternalBuyTokenDestination;

impl TryFrom<Balance> for BuyTokenDestination {
    type Error = ExternalBuyTokenDestination;

    fn try_from(balance: Balance) -> Result<Self, Self::Error> {
        match balance {
            Balance::Erc20 => Ok(Self::Erc20),
            Balance::Internal => Ok(Self::Internal),
            Balance::External => Err(ExternalBuyTokenDestination),
        }
    }
}

impl SellTokenSource {
    pub const fn tag(self) -> [u8; 32] {
        match self {
            Self::Erc20 => BALANCE_ERC20,
            Self::Internal => BALANCE_INTERNAL,
            Self::External => BALANCE_EXTERNAL,
        }
    }
}

impl BuyTokenDestination {
    pub const fn tag(self) -> [u8; 32] {
        match self {
            Self::Erc20 => BALANCE_ERC20,
            Self::Internal => BALANCE_INTERNAL,
        }
    }
}
