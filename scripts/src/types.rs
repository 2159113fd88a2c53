//! Type definitions used throughout the scripts

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, B256},
};
use serde::Serialize;

/// The parameters of the vault contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultParams {
    /// The display name of the vault share token, e.g. "Moo Boo USDC-DEI"
    pub name: String,
    /// The symbol of the vault share token, e.g. "mooBooUSDC-DEI"
    pub symbol: String,
    /// The delay, in seconds, before a proposed strategy upgrade can be accepted
    pub withdrawal_delay_secs: u64,
}

/// The parameters of the strategy contract
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyParams {
    /// The LP token the strategy farms
    pub want: Address,
    /// The id of the `want` pool in the chef contract
    pub pool_id: u64,
    /// The master chef contract the strategy deposits into
    pub chef: Address,
    /// The router used for swaps
    pub router: Address,
    /// The strategist receiving the strategist fee
    pub strategist: Address,
    /// The keeper allowed to manage the strategy
    pub keeper: Address,
    /// The recipient of the platform fees
    pub fee_recipient: Address,
    /// The fee configurator contract
    pub fee_config: Address,
    /// The swap route from the first reward token to the native token
    pub output_to_native_route: Vec<Address>,
    /// The swap route from the second reward token to the native token
    pub second_output_to_native_route: Vec<Address>,
    /// The swap route from the native token to the first LP leg
    pub output_to_lp0_route: Vec<Address>,
    /// The swap route from the native token to the second LP leg
    pub output_to_lp1_route: Vec<Address>,
    /// An optional external identifier for the strategy
    pub ens_id: Option<B256>,
    /// Whether to register the pending rewards probe function after deployment
    pub should_set_pending_rewards_function_name: bool,
    /// The chef function to probe for unclaimed rewards
    pub pending_rewards_function_name: String,
}

/// The build artifact identifiers of the two contracts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractNames {
    /// The vault contract identifier
    pub vault: String,
    /// The strategy contract identifier
    pub strategy: String,
}

/// The addresses the vault and strategy will receive, computed before deployment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictedAddresses {
    /// The predicted vault address
    pub vault: Address,
    /// The predicted strategy address
    pub strategy: Address,
}

/// A contract whose creation transaction has been mined
#[derive(Clone, Debug, PartialEq)]
pub struct DeployedContract {
    /// The build artifact identifier of the contract
    pub contract_id: String,
    /// The address the contract was deployed at
    pub address: Address,
    /// The constructor arguments, in declaration order
    pub constructor_args: Vec<DynSolValue>,
}

impl DeployedContract {
    /// The ABI encoding of the constructor arguments, as appended to the
    /// creation code and as expected by block explorers
    pub fn encoded_constructor_args(&self) -> Bytes {
        encode_constructor_args(&self.constructor_args)
    }
}

/// The vault and strategy, both deployed
#[derive(Clone, Debug, PartialEq)]
pub struct DeployedPair {
    /// The deployed vault
    pub vault: DeployedContract,
    /// The deployed strategy
    pub strategy: DeployedContract,
}

/// The outcome of a single explorer verification request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Verification was disabled for this run
    Skipped,
    /// The explorer accepted the verification
    Verified,
    /// The explorer rejected the verification, or the request never completed
    Failed(String),
}

/// The outcome of the subsidy registration step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsidyStatus {
    /// The target network is not the subsidy network
    Skipped,
    /// Both contracts were registered
    Registered,
}

/// ABI-encode an ordered list of constructor arguments
pub fn encode_constructor_args(args: &[DynSolValue]) -> Bytes {
    DynSolValue::Tuple(args.to_vec()).abi_encode_params().into()
}
