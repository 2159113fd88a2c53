//! The chain RPC boundary: nonce reads, contract creation and plain transactions

use std::time::Duration;

use alloy::{
    network::{Ethereum, ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use async_trait::async_trait;
use tracing::debug;

use crate::{constants::DEFAULT_CONFIRMATIONS, errors::ScriptError};

/// Read access to account nonces
#[async_trait]
pub trait NonceSource: Send + Sync {
    /// The pending transaction count of the given account
    async fn transaction_count(&self, account: Address) -> Result<u64, ScriptError>;
}

/// A signing connection to the chain, sending from a single deployer account.
///
/// Every method that sends a transaction waits for it to be mined before
/// returning, so calls issued in sequence consume consecutive nonces.
#[async_trait]
pub trait ChainClient: NonceSource {
    /// The account transactions are sent from
    fn sender(&self) -> Address;

    /// The chain id of the connected network
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// Send a contract creation transaction and return the created address
    async fn deploy(&self, creation_code: Bytes) -> Result<Address, ScriptError>;

    /// Send a call to an existing contract and return the mined transaction hash
    async fn transact(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError>;
}

#[async_trait]
impl NonceSource for DynProvider<Ethereum> {
    async fn transaction_count(&self, account: Address) -> Result<u64, ScriptError> {
        self.get_transaction_count(account)
            .pending()
            .await
            .map_err(|e| ScriptError::NonceFetching(e.to_string()))
    }
}

/// A [`ChainClient`] backed by an alloy provider with a wallet attached
#[derive(Clone)]
pub struct RpcChainClient {
    /// The provider, with the deployer's signer attached
    provider: DynProvider<Ethereum>,
    /// The deployer address
    sender: Address,
    /// The number of confirmations to wait for on every transaction
    confirmations: u64,
    /// An optional bound on how long to wait for each transaction
    timeout: Option<Duration>,
}

impl RpcChainClient {
    /// Create a client sending from `sender` through `provider`
    pub fn new(provider: DynProvider<Ethereum>, sender: Address) -> Self {
        Self {
            provider,
            sender,
            confirmations: DEFAULT_CONFIRMATIONS,
            timeout: None,
        }
    }

    /// Set the number of confirmations to wait for
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    /// Bound the wait for each transaction
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a transaction and wait for a successful receipt
    async fn send_tx(&self, tx: TransactionRequest) -> Result<TransactionReceipt, String> {
        let pending_tx = self
            .provider
            .send_transaction(tx.with_from(self.sender))
            .await
            .map_err(|e| format!("pending tx error: {e}"))?;
        let tx_hash = *pending_tx.tx_hash();
        debug!(tx = %tx_hash, "waiting for receipt");

        let receipt = pending_tx
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.timeout)
            .get_receipt()
            .await
            .map_err(|e| format!("error awaiting {tx_hash}: {e}"))?;

        if !receipt.status() {
            return Err(format!("transaction {tx_hash} reverted"));
        }

        Ok(receipt)
    }
}

#[async_trait]
impl NonceSource for RpcChainClient {
    async fn transaction_count(&self, account: Address) -> Result<u64, ScriptError> {
        self.provider.transaction_count(account).await
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
    }

    async fn deploy(&self, creation_code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(creation_code);
        let receipt = self
            .send_tx(tx)
            .await
            .map_err(ScriptError::ContractDeployment)?;

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt of {} has no contract address",
                receipt.transaction_hash
            ))
        })
    }

    async fn transact(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        let receipt = self
            .send_tx(tx)
            .await
            .map_err(ScriptError::ContractInteraction)?;

        Ok(receipt.transaction_hash)
    }
}
