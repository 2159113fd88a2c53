//! Definitions of CLI arguments and commands for the deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy_vault, predict_addresses, validate_config},
    constants::DEFAULT_CONFIRMATIONS,
    errors::ScriptError,
};

/// Deploy a vault and its strategy, then hand the vault over to governance
#[derive(Parser)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the vault and strategy and run the post-deployment steps
    DeployVault(DeployVaultArgs),
    /// Print the addresses an account's next contract creations will receive
    PredictAddresses(PredictAddressesArgs),
    /// Assemble and validate the deployment parameters without touching the chain
    ValidateConfig(ValidateConfigArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self) -> Result<(), ScriptError> {
        match self {
            Command::DeployVault(args) => deploy_vault(args).await,
            Command::PredictAddresses(args) => predict_addresses(args).await,
            Command::ValidateConfig(args) => validate_config(args),
        }
    }
}

/// The deployer's connection to the network
#[derive(Args)]
pub struct ChainArgs {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,
}

/// The deployment parameter sources
#[derive(Args)]
pub struct ParamsArgs {
    /// Path to the deployment parameter file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the address book
    #[arg(short, long)]
    pub address_book: PathBuf,

    /// Name of the target network in the address book
    #[arg(short, long)]
    pub network: String,

    /// Strategist address, takes precedence over the parameter file
    #[arg(long, env = "STRATEGIST_ADDRESS")]
    pub strategist: Option<String>,
}

/// Deploy a vault and its strategy
#[derive(Args)]
pub struct DeployVaultArgs {
    /// Chain connection
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Parameter sources
    #[command(flatten)]
    pub params: ParamsArgs,

    /// Build output directory holding the contract artifacts
    #[arg(long, default_value = "out")]
    pub artifacts: PathBuf,

    /// Block explorer API key used for verification
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Skip block explorer verification, regardless of the parameter file
    #[arg(long)]
    pub no_verify: bool,

    /// Forge project root used for verification, if not the working directory
    #[arg(long)]
    pub forge_root: Option<PathBuf>,

    /// Number of confirmations to wait for on every transaction
    #[arg(long, default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Give up on a transaction that isn't confirmed within this many seconds
    #[arg(long)]
    pub tx_timeout_secs: Option<u64>,

    /// Deployments file to record the deployed pair in
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,
}

/// Predict contract creation addresses
#[derive(Args)]
pub struct PredictAddressesArgs {
    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// The account issuing the contract creations, in hex
    #[arg(long)]
    pub creator: String,

    /// Comma-separated offsets from the account's pending nonce
    #[arg(long, value_delimiter = ',', default_values_t = [0u64, 1])]
    pub offsets: Vec<u64>,
}

/// Validate the deployment parameters
#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Parameter sources
    #[command(flatten)]
    pub params: ParamsArgs,
}
