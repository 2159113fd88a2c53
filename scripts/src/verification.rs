//! Block explorer verification of deployed contracts.
//!
//! Each verification runs as its own task so that several can be in flight
//! while the pipeline carries on. A failed verification is captured as a
//! [`VerificationStatus::Failed`] value and never propagates as an error.

use std::{path::PathBuf, sync::Arc};

use alloy::primitives::{hex, Address, Bytes};
use async_trait::async_trait;
use tokio::{process::Command, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    constants::{FORGE_COMMAND, VERIFY_CONTRACT_COMMAND},
    errors::ScriptError,
    types::{DeployedContract, VerificationStatus},
    utils::run_command,
};

/// A request to verify a deployed contract's source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    /// The build artifact identifier of the contract
    pub contract_id: String,
    /// The deployed address
    pub address: Address,
    /// The ABI-encoded constructor arguments
    pub constructor_args: Bytes,
}

impl From<&DeployedContract> for VerificationRequest {
    fn from(contract: &DeployedContract) -> Self {
        Self {
            contract_id: contract.contract_id.clone(),
            address: contract.address,
            constructor_args: contract.encoded_constructor_args(),
        }
    }
}

/// The explorer verification backend
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Submit a verification and wait for the explorer's verdict
    async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError>;
}

/// The outcome of a verification, as reported at the end of the pipeline
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    /// The build artifact identifier of the contract
    pub contract_id: String,
    /// The contract address
    pub address: Address,
    /// The verification result
    #[serde(flatten)]
    pub status: VerificationStatus,
}

/// A verification submitted in the background
pub struct VerificationTask {
    /// The build artifact identifier of the contract
    contract_id: String,
    /// The contract address
    address: Address,
    /// The handle of the spawned verification
    handle: JoinHandle<Result<(), ScriptError>>,
}

impl VerificationTask {
    /// Spawn a verification; it runs independently of every other task
    pub fn submit(verifier: Arc<dyn Verifier>, request: VerificationRequest) -> Self {
        info!(contract = %request.contract_id, address = %request.address, "submitting verification");
        let contract_id = request.contract_id.clone();
        let address = request.address;
        let handle = tokio::spawn(async move { verifier.verify(&request).await });

        Self {
            contract_id,
            address,
            handle,
        }
    }

    /// Wait for the verification to finish and report its outcome
    pub async fn join(self) -> VerificationOutcome {
        let status = match self.handle.await {
            Ok(Ok(())) => {
                info!(contract = %self.contract_id, address = %self.address, "verified");
                VerificationStatus::Verified
            }
            Ok(Err(e)) => {
                warn!(contract = %self.contract_id, address = %self.address, error = %e, "verification failed");
                VerificationStatus::Failed(e.to_string())
            }
            Err(e) => {
                warn!(contract = %self.contract_id, address = %self.address, error = %e, "verification task aborted");
                VerificationStatus::Failed(e.to_string())
            }
        };

        VerificationOutcome {
            contract_id: self.contract_id,
            address: self.address,
            status,
        }
    }
}

/// Join every task, in submission order
pub async fn join_all(tasks: Vec<VerificationTask>) -> Vec<VerificationOutcome> {
    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        outcomes.push(task.join().await);
    }
    outcomes
}

/// A [`Verifier`] that runs `forge verify-contract` against the explorer of
/// the target chain
#[derive(Clone, Debug)]
pub struct ForgeVerifier {
    /// The chain id of the target network
    chain_id: u64,
    /// The explorer API key
    api_key: Option<String>,
    /// The forge project root, if not the working directory
    project_root: Option<PathBuf>,
}

impl ForgeVerifier {
    /// Create a verifier for the given chain
    pub fn new(chain_id: u64, api_key: Option<String>, project_root: Option<PathBuf>) -> Self {
        Self {
            chain_id,
            api_key,
            project_root,
        }
    }

    /// Build the verification command for a request
    fn command(&self, request: &VerificationRequest) -> Command {
        let mut cmd = Command::new(FORGE_COMMAND);
        cmd.arg(VERIFY_CONTRACT_COMMAND)
            .arg(format!("{:#x}", request.address))
            .arg(&request.contract_id)
            .arg("--chain")
            .arg(self.chain_id.to_string())
            .arg("--constructor-args")
            .arg(hex::encode_prefixed(&request.constructor_args))
            .arg("--watch");

        if let Some(key) = &self.api_key {
            cmd.arg("--etherscan-api-key").arg(key);
        }
        if let Some(root) = &self.project_root {
            cmd.arg("--root").arg(root);
        }

        cmd
    }
}

#[async_trait]
impl Verifier for ForgeVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError> {
        let err_msg = format!("failed to verify {}", request.contract_id);
        run_command(self.command(request), &err_msg)
            .await
            .map(|_| ())
            .map_err(ScriptError::Verification)
    }
}
