//! Contains the order model shared by everything that needs to hash, identify,
//! decode or verify CoW Protocol orders.

pub mod app_id;
pub mod aux_data;
pub mod bytes_hex;
pub mod domain;
pub mod onchain;
pub mod order;
pub mod signature;
pub mod tag;
pub mod u256_decimal;

use {
    alloy_primitives::{Address, B256, U256, keccak256},
    alloy_sol_types::SolValue,
    hex::{FromHex, FromHexError},
    std::{fmt, sync::LazyLock},
};

pub use domain::{DomainContext, DomainError, DomainRegistry};

/// The EIP-712 domain name used for computing the domain separator.
static DOMAIN_NAME: LazyLock<B256> = LazyLock::new(|| keccak256(b"Gnosis Protocol"));

/// The EIP-712 domain version used for computing the domain separator.
static DOMAIN_VERSION: LazyLock<B256> = LazyLock::new(|| keccak256(b"v2"));

/// The EIP-712 domain type used computing the domain separator.
static DOMAIN_TYPE_HASH: LazyLock<B256> = LazyLock::new(|| {
    keccak256(b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")
});

#[derive(Copy, Clone, Default, Eq, Hash, PartialEq)]
pub struct DomainSeparator(pub [u8; 32]);

impl std::str::FromStr for DomainSeparator {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(FromHex::from_hex(s.strip_prefix("0x").unwrap_or(s))?))
    }
}

impl fmt::Debug for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl DomainSeparator {
    pub fn new(chain_id: u64, contract_address: Address) -> Self {
        let encoded = (
            *DOMAIN_TYPE_HASH,
            *DOMAIN_NAME,
            *DOMAIN_VERSION,
            U256::from(chain_id),
            contract_address,
        )
            .abi_encode();

        DomainSeparator(keccak256(encoded).0)
    }
}
