//! Pre-flight validation of the assembled parameter set.
//!
//! Nothing is sent to the chain until [`validate`] accepts the parameters.

use alloy::primitives::Address;

use crate::{
    address_book::AddressBookNetwork,
    config::{ContractNamesDraft, ParamsDraft, StrategyParamsDraft, VaultParamsDraft},
    constants::{
        CONTRACT_NAMES, PLATFORM_ADDRESSES, STRATEGY_PARAMS, SUBSIDY_NETWORK, VAULT_PARAMS,
    },
    errors::ScriptError,
    types::{ContractNames, StrategyParams, VaultParams},
};

/// A fully validated parameter set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedParams {
    /// The vault parameters
    pub vault: VaultParams,
    /// The strategy parameters
    pub strategy: StrategyParams,
    /// The contract identifiers
    pub contract_names: ContractNames,
}

/// Platform addresses the post-deployment pipeline depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformTargets {
    /// The governance address receiving vault ownership
    pub governance: Address,
    /// The subsidy registry, present only on the subsidy network
    pub subsidy_registry: Option<Address>,
}

/// Unwrap a required field, naming the structure and field when unset
fn require<T>(
    value: Option<T>,
    structure: &'static str,
    field: &'static str,
) -> Result<T, ScriptError> {
    value.ok_or(ScriptError::MissingField { structure, field })
}

/// Validate that no required field of the three parameter structures is unset
pub fn validate(
    vault: &VaultParamsDraft,
    strategy: &StrategyParamsDraft,
    contract_names: &ContractNamesDraft,
) -> Result<ValidatedParams, ScriptError> {
    let vault = validate_vault(vault.clone())?;
    let strategy = validate_strategy(strategy.clone())?;
    let contract_names = validate_contract_names(contract_names.clone())?;

    Ok(ValidatedParams {
        vault,
        strategy,
        contract_names,
    })
}

/// Validate a full draft, including the route shapes against the network's
/// native token
pub fn validate_draft(
    draft: &ParamsDraft,
    network: &AddressBookNetwork,
) -> Result<ValidatedParams, ScriptError> {
    let params = validate(&draft.vault, &draft.strategy, &draft.contract_names)?;
    let native = network.wrapped_native().ok_or_else(|| {
        ScriptError::InvalidConfig("address book does not list a wrapped native token".into())
    })?;
    validate_routes(&params.strategy, native)?;

    Ok(params)
}

/// Resolve the platform addresses the pipeline needs for the given network
pub fn validate_platform(
    network_name: &str,
    network: &AddressBookNetwork,
) -> Result<PlatformTargets, ScriptError> {
    let platform = network.fee_platform().cloned().unwrap_or_default();
    let governance = require(platform.vault_owner, PLATFORM_ADDRESSES, "vaultOwner")?;

    let subsidy_registry = if network_name == SUBSIDY_NETWORK {
        Some(require(
            platform.subsidy_registry,
            PLATFORM_ADDRESSES,
            "subsidyRegistry",
        )?)
    } else {
        None
    };

    Ok(PlatformTargets {
        governance,
        subsidy_registry,
    })
}

/// Validate the vault parameters
fn validate_vault(draft: VaultParamsDraft) -> Result<VaultParams, ScriptError> {
    let name = require(draft.name, VAULT_PARAMS, "mooName")?;
    let symbol = require(draft.symbol, VAULT_PARAMS, "mooSymbol")?;
    let withdrawal_delay_secs = require(draft.withdrawal_delay_secs, VAULT_PARAMS, "delay")?;

    if name.is_empty() || symbol.is_empty() {
        return Err(ScriptError::InvalidConfig(
            "vault name and symbol must be non-empty".into(),
        ));
    }

    Ok(VaultParams {
        name,
        symbol,
        withdrawal_delay_secs,
    })
}

/// Validate the strategy parameters, requiring a function name when one is to be set
fn validate_strategy(draft: StrategyParamsDraft) -> Result<StrategyParams, ScriptError> {
    let s = STRATEGY_PARAMS;
    let params = StrategyParams {
        want: require(draft.want, s, "want")?,
        pool_id: require(draft.pool_id, s, "poolId")?,
        chef: require(draft.chef, s, "chef")?,
        router: require(draft.router, s, "unirouter")?,
        strategist: require(draft.strategist, s, "strategist")?,
        keeper: require(draft.keeper, s, "keeper")?,
        fee_recipient: require(draft.fee_recipient, s, "beefyFeeRecipient")?,
        fee_config: require(draft.fee_config, s, "beefyFeeConfig")?,
        output_to_native_route: require(draft.output_to_native_route, s, "outputToNativeRoute")?,
        second_output_to_native_route: require(
            draft.second_output_to_native_route,
            s,
            "secondOutputToNativeRoute",
        )?,
        output_to_lp0_route: require(draft.output_to_lp0_route, s, "outputToLp0Route")?,
        output_to_lp1_route: require(draft.output_to_lp1_route, s, "outputToLp1Route")?,
        ens_id: draft.ens_id,
        should_set_pending_rewards_function_name: require(
            draft.should_set_pending_rewards_function_name,
            s,
            "shouldSetPendingRewardsFunctionName",
        )?,
        pending_rewards_function_name: require(
            draft.pending_rewards_function_name,
            s,
            "pendingRewardsFunctionName",
        )?,
    };

    if params.should_set_pending_rewards_function_name
        && params.pending_rewards_function_name.is_empty()
    {
        return Err(ScriptError::InvalidConfig(
            "pending rewards function name must be set when it is to be registered".into(),
        ));
    }

    Ok(params)
}

/// Validate the contract names
fn validate_contract_names(draft: ContractNamesDraft) -> Result<ContractNames, ScriptError> {
    Ok(ContractNames {
        vault: require(draft.vault, CONTRACT_NAMES, "vault")?,
        strategy: require(draft.strategy, CONTRACT_NAMES, "strategy")?,
    })
}

/// Check that every route is non-empty, the reward routes end at the native
/// token and the LP routes start from it
pub fn validate_routes(params: &StrategyParams, native: Address) -> Result<(), ScriptError> {
    let ends_at_native = [
        ("outputToNativeRoute", &params.output_to_native_route),
        ("secondOutputToNativeRoute", &params.second_output_to_native_route),
    ];
    let starts_at_native = [
        ("outputToLp0Route", &params.output_to_lp0_route),
        ("outputToLp1Route", &params.output_to_lp1_route),
    ];

    for (name, route) in ends_at_native.iter().chain(starts_at_native.iter()) {
        if route.is_empty() {
            return Err(ScriptError::InvalidConfig(format!("{name} is empty")));
        }
    }

    for (name, route) in ends_at_native {
        if route.last() != Some(&native) {
            return Err(ScriptError::InvalidConfig(format!(
                "{name} must end at the native token {native:#x}"
            )));
        }
    }

    for (name, route) in starts_at_native {
        if route.first() != Some(&native) {
            return Err(ScriptError::InvalidConfig(format!(
                "{name} must start at the native token {native:#x}"
            )));
        }
    }

    Ok(())
}
