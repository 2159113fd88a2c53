//! Registration of deployed contracts for gas subsidies

use std::sync::Arc;

use alloy::{primitives::Address, sol_types::SolCall};
use async_trait::async_trait;
use tracing::info;

use crate::{chain::ChainClient, errors::ScriptError, solidity::ISubsidyRegistry};

/// The subsidy registration backend
#[async_trait]
pub trait SubsidyRegistrar: Send + Sync {
    /// Register a contract as eligible for gas subsidies
    async fn register(&self, contract: Address) -> Result<(), ScriptError>;
}

/// A [`SubsidyRegistrar`] calling the network's subsidy registry from the deployer account
pub struct ContractSubsidyRegistrar {
    /// The deployer's connection to the chain
    chain: Arc<dyn ChainClient>,
    /// The subsidy registry contract
    registry: Address,
}

impl ContractSubsidyRegistrar {
    /// Create a registrar for the given registry contract
    pub fn new(chain: Arc<dyn ChainClient>, registry: Address) -> Self {
        Self { chain, registry }
    }
}

#[async_trait]
impl SubsidyRegistrar for ContractSubsidyRegistrar {
    async fn register(&self, contract: Address) -> Result<(), ScriptError> {
        let calldata = ISubsidyRegistry::registerCall { target: contract }.abi_encode();
        let tx = self
            .chain
            .transact(self.registry, calldata.into())
            .await
            .map_err(|e| ScriptError::SubsidyRegistration(e.to_string()))?;

        info!(contract = %contract, tx = %tx, "registered for subsidy");
        Ok(())
    }
}
