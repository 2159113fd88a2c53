//! Implementations of the deploy scripts

use std::{str::FromStr, sync::Arc, time::Duration};

use alloy::primitives::Address;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    address_book::{AddressBook, AddressBookNetwork},
    artifacts::FileArtifactStore,
    chain::{ChainClient, RpcChainClient},
    cli::{DeployVaultArgs, ParamsArgs, PredictAddressesArgs, ValidateConfigArgs},
    config::{assemble_params, ConfigOverrides, DeploymentConfig},
    deploy::DeploymentOrchestrator,
    errors::ScriptError,
    pipeline::{PipelineConfig, PipelineReport, PostDeploymentPipeline},
    predict::predict,
    subsidy::{ContractSubsidyRegistrar, SubsidyRegistrar},
    types::{DeployedPair, StrategyParams, SubsidyStatus, VerificationStatus},
    utils::{setup_client, setup_read_only_client, write_deployment_record},
    validation::{validate_draft, validate_platform, PlatformTargets, ValidatedParams},
    verification::{ForgeVerifier, VerificationOutcome},
};

/// Everything a run needs, assembled and validated before the chain is touched
struct DeployContext {
    /// The name of the target network
    network_name: String,
    /// The address book entry of the target network
    network: AddressBookNetwork,
    /// The validated deployment parameters
    params: ValidatedParams,
    /// The platform addresses the pipeline depends on
    targets: PlatformTargets,
    /// Whether the parameter file asks for explorer verification
    verify: bool,
}

impl DeployContext {
    /// Load, assemble and validate the parameters of a run
    fn load(args: &ParamsArgs) -> Result<Self, ScriptError> {
        let config = DeploymentConfig::from_file(&args.config)?;
        let address_book = AddressBook::from_file(&args.address_book)?;
        let network = address_book.network(&args.network)?.clone();

        let overrides = ConfigOverrides {
            strategist: args.strategist.clone(),
        };
        let draft = assemble_params(&config, &network, &overrides)?;
        let params = validate_draft(&draft, &network)?;
        let targets = validate_platform(&args.network, &network)?;

        Ok(Self {
            network_name: args.network.clone(),
            network,
            params,
            targets,
            verify: config.should_verify_on_etherscan,
        })
    }
}

/// The entry written to the deployments file, keyed by vault symbol
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentRecord {
    /// The target network
    network: String,
    /// The chain id of the target network
    chain_id: u64,
    /// The vault contract identifier
    vault_contract: String,
    /// The strategy contract identifier
    strategy_contract: String,
    /// The LP token the strategy farms
    want: Address,
    /// The chef pool id
    pool_id: u64,
    /// The pipeline results, including both contract addresses
    #[serde(flatten)]
    report: PipelineReport,
}

impl DeploymentRecord {
    /// Assemble the record of a completed run
    fn new(
        ctx: &DeployContext,
        deployed: &DeployedPair,
        strategy: &StrategyParams,
        report: PipelineReport,
    ) -> Self {
        Self {
            network: ctx.network_name.clone(),
            chain_id: ctx.network.chain_id,
            vault_contract: deployed.vault.contract_id.clone(),
            strategy_contract: deployed.strategy.contract_id.clone(),
            want: strategy.want,
            pool_id: strategy.pool_id,
            report,
        }
    }
}

/// Deploy the vault and strategy, run the post-deployment pipeline and
/// record the result
pub async fn deploy_vault(args: DeployVaultArgs) -> Result<(), ScriptError> {
    // Everything that can be checked offline is checked before connecting
    let ctx = DeployContext::load(&args.params)?;
    let params = &ctx.params;
    let verify = ctx.verify && !args.no_verify;

    let (provider, signer) = setup_client(&args.chain.priv_key, &args.chain.rpc_url)?;
    let chain = Arc::new(
        RpcChainClient::new(provider, signer.address())
            .with_confirmations(args.confirmations)
            .with_timeout(args.tx_timeout_secs.map(Duration::from_secs)),
    );

    let chain_id = chain.chain_id().await?;
    if chain_id != ctx.network.chain_id {
        return Err(ScriptError::InvalidConfig(format!(
            "RPC is on chain {}, address book lists {} as chain {}",
            chain_id, ctx.network_name, ctx.network.chain_id
        )));
    }
    info!(network = %ctx.network_name, chain_id, deployer = %chain.sender(), "connected");

    let orchestrator =
        DeploymentOrchestrator::new(chain.clone(), Arc::new(FileArtifactStore::new(&args.artifacts)));
    let deployed = orchestrator
        .deploy(&params.vault, &params.strategy, &params.contract_names)
        .await?;

    info!(
        vault = %deployed.vault.address,
        strategy = %deployed.strategy.address,
        want = %params.strategy.want,
        pool_id = params.strategy.pool_id,
        "vault deployed"
    );

    let verifier = Arc::new(ForgeVerifier::new(
        chain_id,
        args.etherscan_api_key.clone(),
        args.forge_root.clone(),
    ));
    let subsidy = ctx.targets.subsidy_registry.map(|registry| {
        Arc::new(ContractSubsidyRegistrar::new(chain.clone(), registry))
            as Arc<dyn SubsidyRegistrar>
    });
    let pipeline = PostDeploymentPipeline::new(
        chain.clone(),
        verifier,
        subsidy,
        PipelineConfig {
            network: ctx.network_name.clone(),
            governance: ctx.targets.governance,
            verify,
        },
    );

    let report = pipeline.run(&deployed, &params.strategy).await?;
    log_report(&report);

    if let Some(path) = &args.deployments_path {
        let record = DeploymentRecord::new(&ctx, &deployed, &params.strategy, report);
        write_deployment_record(path, &params.vault.symbol, &record)?;
        info!(path = %path.display(), "deployment recorded");
    }

    Ok(())
}

/// Log the outcome of every pipeline step
fn log_report(report: &PipelineReport) {
    for VerificationOutcome {
        contract_id,
        address,
        status,
    } in &report.verification
    {
        match status {
            VerificationStatus::Failed(reason) => {
                warn!(contract = %contract_id, address = %address, reason = %reason, "not verified")
            }
            status => info!(contract = %contract_id, address = %address, ?status, "verification"),
        }
    }

    if let Some(name) = &report.pending_rewards_function_name {
        info!(function = %name, "pending rewards function set");
    }
    info!(owner = %report.vault_owner, "vault ownership transferred");
    match report.subsidy {
        SubsidyStatus::Registered => info!("registered for subsidy"),
        SubsidyStatus::Skipped => info!("subsidy registration skipped"),
    }
}

/// Predict the addresses of an account's next contract creations
pub async fn predict_addresses(args: PredictAddressesArgs) -> Result<(), ScriptError> {
    let creator = Address::from_str(&args.creator)
        .map_err(|e| ScriptError::InvalidConfig(format!("{}: {}", args.creator, e)))?;
    let provider = setup_read_only_client(&args.rpc_url)?;

    let predicted = predict(&provider, creator, &args.offsets).await?;
    for (offset, address) in predicted {
        info!(creator = %creator, offset, address = %address, "predicted");
    }

    Ok(())
}

/// Assemble and validate the parameters without touching the chain
pub fn validate_config(args: ValidateConfigArgs) -> Result<(), ScriptError> {
    let ctx = DeployContext::load(&args.params)?;
    let params = &ctx.params;

    info!(
        network = %ctx.network_name,
        vault = %params.vault.symbol,
        vault_contract = %params.contract_names.vault,
        strategy_contract = %params.contract_names.strategy,
        governance = %ctx.targets.governance,
        verify = ctx.verify,
        "parameters are valid"
    );

    Ok(())
}
