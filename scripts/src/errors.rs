//! Definitions of errors that can occur during the execution of the vault deployment scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy::primitives::Address;

/// Errors that can occur during the execution of the vault deployment scripts
#[derive(Debug)]
pub enum ScriptError {
    /// A required parameter was left unset
    MissingField {
        /// The parameter structure the field belongs to
        structure: &'static str,
        /// The name of the unset field
        field: &'static str,
    },
    /// A parameter was set to an unusable value
    InvalidConfig(String),
    /// Error reading a configuration or artifact file
    ReadFile(String),
    /// Error writing the deployments file
    WriteFile(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error fetching the nonce of the deployer
    NonceFetching(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// A contract landed at an address other than the one predicted for it
    AddressMismatch {
        /// The contract identifier
        contract: String,
        /// The address computed before deployment
        predicted: Address,
        /// The address the contract was actually deployed at
        deployed: Address,
    },
    /// The vault was deployed but the strategy deployment failed.
    /// The vault is left on-chain without a working strategy.
    PartialDeployment {
        /// The address of the orphaned vault
        vault: Address,
        /// The error that aborted the strategy deployment
        cause: Box<ScriptError>,
    },
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error registering a contract for gas subsidies
    SubsidyRegistration(String),
    /// Error verifying a contract on the block explorer
    Verification(String),
}

impl ScriptError {
    /// Whether the error must abort the run.
    ///
    /// Only explorer verification failures are absorbed into the pipeline report.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScriptError::Verification(_))
    }

    /// The address of a vault the error left on-chain without a working strategy.
    ///
    /// A bare address mismatch can only come from the vault, since a strategy
    /// mismatch is reported inside [`ScriptError::PartialDeployment`].
    pub fn orphaned_vault(&self) -> Option<Address> {
        match self {
            ScriptError::PartialDeployment { vault, .. } => Some(*vault),
            ScriptError::AddressMismatch { deployed, .. } => Some(*deployed),
            _ => None,
        }
    }

    /// Whether the error was raised before any chain interaction took place
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScriptError::MissingField { .. }
                | ScriptError::InvalidConfig(_)
                | ScriptError::ReadFile(_)
                | ScriptError::ArtifactParsing(_)
        )
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::MissingField { structure, field } => {
                write!(f, "one of config values undefined: {}.{}", structure, field)
            }
            ScriptError::InvalidConfig(s) => write!(f, "invalid config: {}", s),
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::NonceFetching(s) => write!(f, "error fetching nonce: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::AddressMismatch {
                contract,
                predicted,
                deployed,
            } => write!(
                f,
                "{} deployed at {:#x} but {:#x} was predicted",
                contract, deployed, predicted
            ),
            ScriptError::PartialDeployment { vault, cause } => write!(
                f,
                "vault deployed at {:#x} without a strategy: {}",
                vault, cause
            ),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::SubsidyRegistration(s) => write!(f, "error registering subsidy: {}", s),
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
        }
    }
}

impl Error for ScriptError {}
