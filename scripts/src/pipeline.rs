//! The post-deployment pipeline.
//!
//! Steps, in order:
//! 1. explorer verification of both contracts, started in the background
//! 2. pending rewards function registration, if enabled
//! 3. vault ownership transfer to governance
//! 4. join the verifications
//! 5. subsidy registration of both contracts, on the subsidy network only
//!
//! Steps 2, 3 and 5 block and abort the run on failure. Verification failures
//! are recorded in the report and never abort the run.

use std::sync::Arc;

use alloy::{primitives::Address, sol_types::SolCall};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    chain::ChainClient,
    constants::SUBSIDY_NETWORK,
    errors::ScriptError,
    solidity::{IBeefyVault, IStrategy},
    subsidy::SubsidyRegistrar,
    types::{DeployedPair, StrategyParams, SubsidyStatus, VerificationStatus},
    verification::{join_all, VerificationOutcome, VerificationRequest, VerificationTask, Verifier},
};

/// Per-run settings of the pipeline
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// The name of the target network
    pub network: String,
    /// The governance address that takes ownership of the vault
    pub governance: Address,
    /// Whether to verify the contracts on the block explorer
    pub verify: bool,
}

/// The result of a successful pipeline run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    /// The vault address
    pub vault: Address,
    /// The strategy address
    pub strategy: Address,
    /// The verification outcome of each contract
    pub verification: Vec<VerificationOutcome>,
    /// The pending rewards function registered on the strategy, if any
    pub pending_rewards_function_name: Option<String>,
    /// The new owner of the vault
    pub vault_owner: Address,
    /// Whether the contracts were registered for subsidies
    pub subsidy: SubsidyStatus,
}

/// Runs the post-deployment configuration of a freshly deployed pair
pub struct PostDeploymentPipeline {
    /// The deployer's connection to the chain
    chain: Arc<dyn ChainClient>,
    /// The explorer verification backend
    verifier: Arc<dyn Verifier>,
    /// The subsidy backend, required on the subsidy network
    subsidy: Option<Arc<dyn SubsidyRegistrar>>,
    /// Run settings
    config: PipelineConfig,
}

impl PostDeploymentPipeline {
    /// Create a pipeline
    pub fn new(
        chain: Arc<dyn ChainClient>,
        verifier: Arc<dyn Verifier>,
        subsidy: Option<Arc<dyn SubsidyRegistrar>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            chain,
            verifier,
            subsidy,
            config,
        }
    }

    /// Run every step against the deployed pair
    pub async fn run(
        &self,
        deployed: &DeployedPair,
        strategy_params: &StrategyParams,
    ) -> Result<PipelineReport, ScriptError> {
        info!("running post deployment");

        // Verification is slow, start it first and join it last
        let tasks = self.start_verification(deployed);

        let configured = self.configure(deployed, strategy_params).await;
        let verification = if self.config.verify {
            join_all(tasks).await
        } else {
            skipped_verification(deployed)
        };
        let pending_rewards_function_name = configured?;

        let subsidy = self.register_subsidy(deployed).await?;

        Ok(PipelineReport {
            vault: deployed.vault.address,
            strategy: deployed.strategy.address,
            verification,
            pending_rewards_function_name,
            vault_owner: self.config.governance,
            subsidy,
        })
    }

    /// Submit both verifications in the background
    fn start_verification(&self, deployed: &DeployedPair) -> Vec<VerificationTask> {
        if !self.config.verify {
            return Vec::new();
        }

        [&deployed.vault, &deployed.strategy]
            .into_iter()
            .map(|contract| {
                VerificationTask::submit(self.verifier.clone(), VerificationRequest::from(contract))
            })
            .collect()
    }

    /// The blocking configuration steps: pending rewards function, then ownership
    async fn configure(
        &self,
        deployed: &DeployedPair,
        strategy_params: &StrategyParams,
    ) -> Result<Option<String>, ScriptError> {
        let pending_rewards_function_name = if strategy_params.should_set_pending_rewards_function_name
        {
            let name = strategy_params.pending_rewards_function_name.clone();
            self.set_pending_rewards_function_name(deployed.strategy.address, &name)
                .await?;
            Some(name)
        } else {
            None
        };

        self.transfer_ownership(deployed.vault.address).await?;
        Ok(pending_rewards_function_name)
    }

    /// Register the chef function the strategy probes for pending rewards
    async fn set_pending_rewards_function_name(
        &self,
        strategy: Address,
        name: &str,
    ) -> Result<(), ScriptError> {
        info!(strategy = %strategy, function = name, "setting pending rewards function name");
        let calldata = IStrategy::setPendingRewardsFunctionNameCall {
            _pendingRewardsFunctionName: name.to_string(),
        }
        .abi_encode();

        self.chain.transact(strategy, calldata.into()).await?;
        Ok(())
    }

    /// Hand the vault over to governance
    async fn transfer_ownership(&self, vault: Address) -> Result<(), ScriptError> {
        let governance = self.config.governance;
        info!(vault = %vault, owner = %governance, "transferring vault owner");
        let calldata = IBeefyVault::transferOwnershipCall {
            newOwner: governance,
        }
        .abi_encode();

        self.chain.transact(vault, calldata.into()).await?;
        Ok(())
    }

    /// Register the vault, then the strategy, on the subsidy network only
    async fn register_subsidy(&self, deployed: &DeployedPair) -> Result<SubsidyStatus, ScriptError> {
        if self.config.network != SUBSIDY_NETWORK {
            return Ok(SubsidyStatus::Skipped);
        }

        let registrar = self.subsidy.as_ref().ok_or_else(|| {
            ScriptError::SubsidyRegistration(format!(
                "no subsidy registrar configured for {}",
                self.config.network
            ))
        })?;

        for contract in [&deployed.vault, &deployed.strategy] {
            registrar
                .register(contract.address)
                .await
                .inspect_err(|_| {
                    warn!(contract = %contract.contract_id, address = %contract.address, "subsidy registration failed")
                })?;
        }

        Ok(SubsidyStatus::Registered)
    }
}

/// The report entries of a run with verification disabled
fn skipped_verification(deployed: &DeployedPair) -> Vec<VerificationOutcome> {
    [&deployed.vault, &deployed.strategy]
        .into_iter()
        .map(|contract| VerificationOutcome {
            contract_id: contract.contract_id.clone(),
            address: contract.address,
            status: VerificationStatus::Skipped,
        })
        .collect()
}
