//! Constants used in the deploy scripts

/// The nonce offset of the vault creation transaction, relative to the
/// deployer's nonce at the start of the run
pub const VAULT_NONCE_OFFSET: u64 = 0;

/// The nonce offset of the strategy creation transaction, relative to the
/// deployer's nonce at the start of the run
pub const STRATEGY_NONCE_OFFSET: u64 = 1;

/// The default number of confirmations to wait for on every transaction
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// The only network on which deployed contracts are registered for gas subsidies
pub const SUBSIDY_NETWORK: &str = "fantom";

/// The address book key under which the wrapped native token is aliased
pub const WRAPPED_NATIVE_TOKEN_KEY: &str = "WNATIVE";

/// The address book key of the platform supplying keeper, fee and governance addresses
pub const FEE_PLATFORM_KEY: &str = "beefyfinance";

/// The name of the `forge` command
pub const FORGE_COMMAND: &str = "forge";

/// The name of the forge contract verification subcommand
pub const VERIFY_CONTRACT_COMMAND: &str = "verify-contract";

/// The extension of a compilation artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The maximum length in bytes of a string encoded into a `bytes32`,
/// leaving room for the null terminator
pub const MAX_BYTES32_STRING_LEN: usize = 31;

// Names of the parameter structures, used in validation errors

/// The vault parameter structure
pub const VAULT_PARAMS: &str = "vaultParams";

/// The strategy parameter structure
pub const STRATEGY_PARAMS: &str = "strategyParams";

/// The contract names structure
pub const CONTRACT_NAMES: &str = "contractNames";

/// The platform addresses resolved from the address book
pub const PLATFORM_ADDRESSES: &str = "platformAddresses";
