//! Deployment of the vault and its strategy.
//!
//! The vault and strategy reference each other at construction. The vault is
//! created first, pointing at the address the strategy is *predicted* to
//! receive; the strategy is created second with the vault's *mined* address.
//! Both creations come from the same account in that order, so the strategy
//! lands exactly at its predicted address. The two steps must never be
//! reordered or run concurrently.

use std::sync::Arc;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use itertools::Itertools;
use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    chain::ChainClient,
    errors::ScriptError,
    predict::predict_pair,
    types::{ContractNames, DeployedContract, DeployedPair, StrategyParams, VaultParams},
};

/// The vault constructor arguments:
/// `[strategy, name, symbol, approvalDelay]`
pub fn vault_constructor_args(strategy: Address, params: &VaultParams) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Address(strategy),
        DynSolValue::String(params.name.clone()),
        DynSolValue::String(params.symbol.clone()),
        DynSolValue::Uint(U256::from(params.withdrawal_delay_secs), 256),
    ]
}

/// The strategy constructor arguments:
/// `[want, poolId, chef, (vault, router, keeper, strategist, feeRecipient, feeConfig),
/// outputToNative, secondOutputToNative, outputToLp0, outputToLp1]`
pub fn strategy_constructor_args(vault: Address, params: &StrategyParams) -> Vec<DynSolValue> {
    let common_addresses = DynSolValue::Tuple(vec![
        DynSolValue::Address(vault),
        DynSolValue::Address(params.router),
        DynSolValue::Address(params.keeper),
        DynSolValue::Address(params.strategist),
        DynSolValue::Address(params.fee_recipient),
        DynSolValue::Address(params.fee_config),
    ]);

    vec![
        DynSolValue::Address(params.want),
        DynSolValue::Uint(U256::from(params.pool_id), 256),
        DynSolValue::Address(params.chef),
        common_addresses,
        route_value(&params.output_to_native_route),
        route_value(&params.second_output_to_native_route),
        route_value(&params.output_to_lp0_route),
        route_value(&params.output_to_lp1_route),
    ]
}

/// An `address[]` swap route
fn route_value(route: &[Address]) -> DynSolValue {
    DynSolValue::Array(route.iter().copied().map(DynSolValue::Address).collect())
}

/// Fail unless a contract landed where it was predicted to
fn ensure_predicted(
    contract_id: &str,
    predicted: Address,
    deployed: Address,
) -> Result<(), ScriptError> {
    if predicted != deployed {
        return Err(ScriptError::AddressMismatch {
            contract: contract_id.to_string(),
            predicted,
            deployed,
        });
    }

    Ok(())
}

/// Sequences the two dependent contract creations
pub struct DeploymentOrchestrator {
    /// The deployer's connection to the chain
    chain: Arc<dyn ChainClient>,
    /// The compiled contracts
    artifacts: Arc<dyn ArtifactStore>,
}

impl DeploymentOrchestrator {
    /// Create an orchestrator deploying from the chain client's sender
    pub fn new(chain: Arc<dyn ChainClient>, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self { chain, artifacts }
    }

    /// Deploy the vault, then the strategy, and return both once mined.
    ///
    /// Any failure aborts the sequence. A failure after the vault is mined is
    /// reported as [`ScriptError::PartialDeployment`] carrying the vault address.
    pub async fn deploy(
        &self,
        vault_params: &VaultParams,
        strategy_params: &StrategyParams,
        contract_names: &ContractNames,
    ) -> Result<DeployedPair, ScriptError> {
        // Resolve both artifacts before anything is sent
        let vault_artifact = self.artifacts.artifact(&contract_names.vault)?;
        let strategy_artifact = self.artifacts.artifact(&contract_names.strategy)?;

        let deployer = self.chain.sender();
        let predicted = predict_pair(self.chain.as_ref(), deployer).await?;
        info!(
            deployer = %deployer,
            vault = %predicted.vault,
            strategy = %predicted.strategy,
            "predicted addresses"
        );

        info!(name = %vault_params.name, "deploying vault");
        let vault_args = vault_constructor_args(predicted.strategy, vault_params);
        let vault_code = vault_artifact.creation_code(&vault_args)?;
        let vault_address = self.chain.deploy(vault_code).await?;
        ensure_predicted(&contract_names.vault, predicted.vault, vault_address)?;
        let vault = DeployedContract {
            contract_id: contract_names.vault.clone(),
            address: vault_address,
            constructor_args: vault_args,
        };

        let strategy_args = strategy_constructor_args(vault.address, strategy_params);
        info!(
            vault = %vault.address,
            output_to_native = %strategy_params.output_to_native_route.iter().join(" -> "),
            output_to_lp0 = %strategy_params.output_to_lp0_route.iter().join(" -> "),
            output_to_lp1 = %strategy_params.output_to_lp1_route.iter().join(" -> "),
            "deploying strategy"
        );
        let strategy_address = async {
            let strategy_code = strategy_artifact.creation_code(&strategy_args)?;
            let address = self.chain.deploy(strategy_code).await?;
            ensure_predicted(&contract_names.strategy, predicted.strategy, address)?;
            Ok::<_, ScriptError>(address)
        }
        .await
        .map_err(|cause| ScriptError::PartialDeployment {
            vault: vault.address,
            cause: Box::new(cause),
        })?;

        let strategy = DeployedContract {
            contract_id: contract_names.strategy.clone(),
            address: strategy_address,
            constructor_args: strategy_args,
        };

        Ok(DeployedPair { vault, strategy })
    }
}
