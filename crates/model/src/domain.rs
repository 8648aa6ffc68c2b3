//! Per-chain hashing namespaces and the registry that caches them.

use {
    crate::DomainSeparator,
    alloy_primitives::{Address, address},
    dashmap::DashMap,
    std::{collections::HashMap, sync::LazyLock},
};

pub mod networks {
    pub const MAINNET: u64 = 1;
    pub const GNOSIS: u64 = 100;
    pub const SEPOLIA: u64 = 11155111;
    pub const ARBITRUM_ONE: u64 = 42161;
    pub const BASE: u64 = 8453;
}

/// The settlement contract is deployed deterministically, so it lives at the
/// same address on every supported network.
pub const SETTLEMENT_CONTRACT: Address = address!("0x9008D19f58AAbD9eD0D60971565AA8510560ab41");

/// Settlement contract deployments keyed by chain id.
pub static SETTLEMENT_DEPLOYMENTS: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
    use networks::*;
    maplit::hashmap! {
        MAINNET => SETTLEMENT_CONTRACT,
        GNOSIS => SETTLEMENT_CONTRACT,
        SEPOLIA => SETTLEMENT_CONTRACT,
        ARBITRUM_ONE => SETTLEMENT_CONTRACT,
        BASE => SETTLEMENT_CONTRACT,
    }
});

/// Production ETH-flow contract deployments keyed by chain id.
pub static ETHFLOW_DEPLOYMENTS: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
    use networks::*;
    maplit::hashmap! {
        MAINNET => address!("0x40A50cf069e992AA4536211B23F286eF88752187"),
        GNOSIS => address!("0x40A50cf069e992AA4536211B23F286eF88752187"),
    }
});

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("settlement contract address must not be zero")]
    ZeroSettlementContract,
    #[error("chain id must not be zero")]
    ZeroChainId,
    #[error("no known settlement contract deployment on chain {0}")]
    UnknownChain(u64),
}

/// The hashing namespace of one settlement contract deployment.
///
/// The same order hashes to a different digest under each context, which is
/// what prevents replaying a signature on another chain or contract.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DomainContext {
    chain_id: u64,
    settlement_contract: Address,
    separator: DomainSeparator,
}

impl DomainContext {
    pub fn new(chain_id: u64, settlement_contract: Address) -> Result<Self, DomainError> {
        if chain_id == 0 {
            return Err(DomainError::ZeroChainId);
        }
        if settlement_contract.is_zero() {
            return Err(DomainError::ZeroSettlementContract);
        }
        Ok(Self {
            chain_id,
            settlement_contract,
            separator: DomainSeparator::new(chain_id, settlement_contract),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn settlement_contract(&self) -> Address {
        self.settlement_contract
    }

    pub fn separator(&self) -> &DomainSeparator {
        &self.separator
    }
}

/// Lazily populated cache of domain contexts for the known deployments.
///
/// Entries are computed on first use and never change afterwards.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    contexts: DashMap<u64, DomainContext>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the context for the settlement contract deployed on the given
    /// chain.
    pub fn get(&self, chain_id: u64) -> Result<DomainContext, DomainError> {
        if let Some(context) = self.contexts.get(&chain_id) {
            return Ok(*context);
        }
        let settlement = SETTLEMENT_DEPLOYMENTS
            .get(&chain_id)
            .copied()
            .ok_or(DomainError::UnknownChain(chain_id))?;
        let context = DomainContext::new(chain_id, settlement)?;
        Ok(*self.contexts.entry(chain_id).or_insert(context))
    }

    /// Process wide registry.
    pub fn global() -> &'static Self {
        static REGISTRY: LazyLock<DomainRegistry> = LazyLock::new(DomainRegistry::new);
        &REGISTRY
    }
}
