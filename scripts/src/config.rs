//! The deployment parameter file and its assembly into parameter drafts.
//!
//! Every field of the parameter file is optional when deserialized, an
//! omitted value is the "unset" sentinel that [`crate::validation`] rejects.
//! Assembly resolves token symbols and platform defaults through the
//! [`AddressBookNetwork`] without deciding whether a value is required.

use std::path::Path;

use alloy::primitives::{Address, B256};
use serde::Deserialize;

use crate::{
    address_book::AddressBookNetwork,
    errors::ScriptError,
    utils::{format_bytes32_string, read_json_file},
};

/// The vault section of the parameter file
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    /// The display name of the vault share token
    pub moo_name: Option<String>,
    /// The symbol of the vault share token
    pub moo_symbol: Option<String>,
    /// The strategy upgrade delay in seconds
    pub delay: Option<u64>,
}

/// The strategy section of the parameter file.
///
/// Addresses may be given in hex or as a token symbol from the address book.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    /// The LP token the strategy farms
    pub want: Option<String>,
    /// The id of the `want` pool in the chef
    pub pool_id: Option<u64>,
    /// The chef contract
    pub chef: Option<String>,
    /// The swap router
    pub unirouter: Option<String>,
    /// The strategist, usually supplied on the command line instead
    pub strategist: Option<String>,
    /// The keeper, defaults to the platform keeper
    pub keeper: Option<String>,
    /// The fee recipient, defaults to the platform fee recipient
    pub beefy_fee_recipient: Option<String>,
    /// The fee configurator, defaults to the platform fee config
    pub beefy_fee_config: Option<String>,
    /// First reward token -> native
    pub output_to_native_route: Option<Vec<String>>,
    /// Second reward token -> native
    pub second_output_to_native_route: Option<Vec<String>>,
    /// Native -> first LP leg
    pub output_to_lp0_route: Option<Vec<String>>,
    /// Native -> second LP leg
    pub output_to_lp1_route: Option<Vec<String>>,
    /// Optional external identifier, encoded as a `bytes32` string
    pub ens_id: Option<String>,
    /// Whether to set the pending rewards function after deployment
    pub should_set_pending_rewards_function_name: Option<bool>,
    /// The pending rewards probe function of the chef
    pub pending_rewards_function_name: Option<String>,
}

/// The contract names section of the parameter file
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractNamesConfig {
    /// The vault build artifact identifier
    pub vault: Option<String>,
    /// The strategy build artifact identifier
    pub strategy: Option<String>,
}

/// The deployment parameter file
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// Vault parameters
    #[serde(default)]
    pub vault: VaultConfig,
    /// Strategy parameters
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Contract names
    #[serde(default)]
    pub contract_names: ContractNamesConfig,
    /// Whether to verify the deployed contracts on the block explorer
    #[serde(default = "default_should_verify")]
    pub should_verify_on_etherscan: bool,
}

/// Verification is on unless the parameter file turns it off
fn default_should_verify() -> bool {
    true
}

impl DeploymentConfig {
    /// Read the parameter file at the given path
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let value = read_json_file(path)?;
        serde_json::from_value(value).map_err(|e| ScriptError::ReadFile(e.to_string()))
    }
}

/// Vault parameters after assembly, possibly incomplete
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VaultParamsDraft {
    /// The vault share token name
    pub name: Option<String>,
    /// The vault share token symbol
    pub symbol: Option<String>,
    /// The strategy upgrade delay in seconds
    pub withdrawal_delay_secs: Option<u64>,
}

/// Strategy parameters after assembly, possibly incomplete
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyParamsDraft {
    /// The LP token
    pub want: Option<Address>,
    /// The chef pool id
    pub pool_id: Option<u64>,
    /// The chef contract
    pub chef: Option<Address>,
    /// The swap router
    pub router: Option<Address>,
    /// The strategist
    pub strategist: Option<Address>,
    /// The keeper
    pub keeper: Option<Address>,
    /// The platform fee recipient
    pub fee_recipient: Option<Address>,
    /// The fee configurator
    pub fee_config: Option<Address>,
    /// First reward token -> native
    pub output_to_native_route: Option<Vec<Address>>,
    /// Second reward token -> native
    pub second_output_to_native_route: Option<Vec<Address>>,
    /// Native -> first LP leg
    pub output_to_lp0_route: Option<Vec<Address>>,
    /// Native -> second LP leg
    pub output_to_lp1_route: Option<Vec<Address>>,
    /// The `bytes32` encoded external identifier
    pub ens_id: Option<B256>,
    /// Whether to set the pending rewards function
    pub should_set_pending_rewards_function_name: Option<bool>,
    /// The pending rewards probe function
    pub pending_rewards_function_name: Option<String>,
}

/// Contract names after assembly, possibly incomplete
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractNamesDraft {
    /// The vault artifact identifier
    pub vault: Option<String>,
    /// The strategy artifact identifier
    pub strategy: Option<String>,
}

/// Values supplied on the command line or through the environment,
/// taking precedence over the parameter file
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// The strategist address
    pub strategist: Option<String>,
}

/// The full parameter set, assembled but not yet validated
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamsDraft {
    /// Vault parameters
    pub vault: VaultParamsDraft,
    /// Strategy parameters
    pub strategy: StrategyParamsDraft,
    /// Contract names
    pub contract_names: ContractNamesDraft,
}

/// Assemble the parameter drafts from the parameter file, the address book
/// entry of the target network and the command line overrides
pub fn assemble_params(
    config: &DeploymentConfig,
    network: &AddressBookNetwork,
    overrides: &ConfigOverrides,
) -> Result<ParamsDraft, ScriptError> {
    let vault = VaultParamsDraft {
        name: config.vault.moo_name.clone(),
        symbol: config.vault.moo_symbol.clone(),
        withdrawal_delay_secs: config.vault.delay,
    };

    let strat = &config.strategy;
    let platform = network.fee_platform();
    let resolve = |value: &Option<String>| value.as_deref().map(|v| network.resolve(v)).transpose();
    let resolve_route = |route: &Option<Vec<String>>| {
        route
            .as_ref()
            .map(|hops| network.resolve_route(hops))
            .transpose()
    };

    let strategist = overrides.strategist.clone().or_else(|| strat.strategist.clone());
    let keeper = resolve(&strat.keeper)?.or(platform.and_then(|p| p.keeper));
    let fee_recipient =
        resolve(&strat.beefy_fee_recipient)?.or(platform.and_then(|p| p.beefy_fee_recipient));
    let fee_config =
        resolve(&strat.beefy_fee_config)?.or(platform.and_then(|p| p.beefy_fee_config));
    let ens_id = strat
        .ens_id
        .as_deref()
        .map(format_bytes32_string)
        .transpose()?;

    let strategy = StrategyParamsDraft {
        want: resolve(&strat.want)?,
        pool_id: strat.pool_id,
        chef: resolve(&strat.chef)?,
        router: resolve(&strat.unirouter)?,
        strategist: resolve(&strategist)?,
        keeper,
        fee_recipient,
        fee_config,
        output_to_native_route: resolve_route(&strat.output_to_native_route)?,
        second_output_to_native_route: resolve_route(&strat.second_output_to_native_route)?,
        output_to_lp0_route: resolve_route(&strat.output_to_lp0_route)?,
        output_to_lp1_route: resolve_route(&strat.output_to_lp1_route)?,
        ens_id,
        should_set_pending_rewards_function_name: strat.should_set_pending_rewards_function_name,
        pending_rewards_function_name: strat.pending_rewards_function_name.clone(),
    };

    let contract_names = ContractNamesDraft {
        vault: config.contract_names.vault.clone(),
        strategy: config.contract_names.strategy.clone(),
    };

    Ok(ParamsDraft {
        vault,
        strategy,
        contract_names,
    })
}
