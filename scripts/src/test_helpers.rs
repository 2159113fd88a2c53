//! In-memory stand-ins for the chain, artifact, verification and subsidy
//! boundaries, plus the Fantom scenario fixtures shared across unit tests

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::primitives::{address, Address, Bytes, TxHash};
use async_trait::async_trait;
use serde_json::json;

use crate::{
    address_book::{AddressBookNetwork, PlatformAddresses, TokenEntry},
    artifacts::{Artifact, ArtifactStore},
    chain::{ChainClient, NonceSource},
    config::{ContractNamesDraft, ParamsDraft, StrategyParamsDraft, VaultParamsDraft},
    constants::{FEE_PLATFORM_KEY, WRAPPED_NATIVE_TOKEN_KEY},
    errors::ScriptError,
    subsidy::SubsidyRegistrar,
    utils::format_bytes32_string,
    validation::{validate_draft, ValidatedParams},
    verification::{VerificationRequest, Verifier},
};

// Fantom mainnet addresses of the Boo USDC-DEI scenario

pub const WANT: Address = address!("91f7120898b4be26cc1e84f421e76725c07d1361");
pub const CHEF: Address = address!("9c9c920e51778c4abf727b8bb223e78132f00aa4");
pub const ROUTER: Address = address!("f491e7b69e4244ad4002bc14e878a34207e38c29");
pub const WFTM: Address = address!("21be370d5312f44cb42ce377bc9b8a0cef1a4c83");
pub const USDC: Address = address!("04068da6c83afcfa0e13ba15a6696662335d5b75");
pub const BOO: Address = address!("841fad6eae12c286d1fd18d1d525dffa75c7effe");
pub const DEUS: Address = address!("de5ed76e7c05ec5e4572cfc88d1acea165109e44");
pub const LP1: Address = address!("de1e704dae0b4051e80dabb26ab6ad6c12262da0");

// Synthetic platform and account addresses

pub const DEPLOYER: Address = address!("00000000000000000000000000000000000000d0");
pub const STRATEGIST: Address = address!("00000000000000000000000000000000000000e1");
pub const KEEPER: Address = address!("00000000000000000000000000000000000000e2");
pub const FEE_RECIPIENT: Address = address!("00000000000000000000000000000000000000e3");
pub const FEE_CONFIG: Address = address!("00000000000000000000000000000000000000e4");
pub const GOVERNANCE: Address = address!("00000000000000000000000000000000000000e5");
pub const SUBSIDY_REGISTRY: Address = address!("00000000000000000000000000000000000000e6");

/// The Fantom address book entry of the scenario
pub fn fantom_network() -> AddressBookNetwork {
    let token = |address| TokenEntry { address };
    let tokens = HashMap::from([
        ("WFTM".to_string(), token(WFTM)),
        (WRAPPED_NATIVE_TOKEN_KEY.to_string(), token(WFTM)),
        ("USDC".to_string(), token(USDC)),
        ("BOO".to_string(), token(BOO)),
        ("DEUS".to_string(), token(DEUS)),
    ]);
    let platform = PlatformAddresses {
        keeper: Some(KEEPER),
        beefy_fee_recipient: Some(FEE_RECIPIENT),
        beefy_fee_config: Some(FEE_CONFIG),
        vault_owner: Some(GOVERNANCE),
        subsidy_registry: Some(SUBSIDY_REGISTRY),
    };

    AddressBookNetwork {
        chain_id: 250,
        tokens,
        platforms: HashMap::from([(FEE_PLATFORM_KEY.to_string(), platform)]),
    }
}

/// The fully populated parameter draft of the Boo USDC-DEI vault
pub fn scenario_draft() -> ParamsDraft {
    ParamsDraft {
        vault: VaultParamsDraft {
            name: Some("Moo Boo USDC-DEI".to_string()),
            symbol: Some("mooBooUSDC-DEI".to_string()),
            withdrawal_delay_secs: Some(21600),
        },
        strategy: StrategyParamsDraft {
            want: Some(WANT),
            pool_id: Some(2),
            chef: Some(CHEF),
            router: Some(ROUTER),
            strategist: Some(STRATEGIST),
            keeper: Some(KEEPER),
            fee_recipient: Some(FEE_RECIPIENT),
            fee_config: Some(FEE_CONFIG),
            output_to_native_route: Some(vec![DEUS, WFTM]),
            second_output_to_native_route: Some(vec![BOO, WFTM]),
            output_to_lp0_route: Some(vec![WFTM, USDC]),
            output_to_lp1_route: Some(vec![WFTM, USDC, LP1]),
            ens_id: format_bytes32_string("boo.eth").ok(),
            should_set_pending_rewards_function_name: Some(false),
            pending_rewards_function_name: Some("pendingToken".to_string()),
        },
        contract_names: ContractNamesDraft {
            vault: Some("BeefyVaultV6".to_string()),
            strategy: Some("StrategySpookyV2LP".to_string()),
        },
    }
}

/// The validated parameters of the Boo USDC-DEI vault
pub fn scenario_params() -> ValidatedParams {
    validate_draft(&scenario_draft(), &fantom_network()).unwrap()
}

/// A shared, ordered log of events across several mocks
#[derive(Clone, Debug, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A state-changing call received by the [`MockChain`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
    Deploy { address: Address, code: Bytes },
    Transact { to: Address, calldata: Bytes },
}

#[derive(Default)]
struct MockChainState {
    nonce: u64,
    calls: Vec<RecordedCall>,
    fail_nonce_reads: bool,
    foreign_tx_pending: bool,
    deploys_before_failure: Option<usize>,
    deploys: usize,
    failing_targets: HashSet<Address>,
}

/// A chain with a single sending account that mines every transaction at once
pub struct MockChain {
    sender: Address,
    state: Mutex<MockChainState>,
    events: Option<EventLog>,
}

impl MockChain {
    pub fn new(sender: Address, nonce: u64) -> Self {
        Self {
            sender,
            state: Mutex::new(MockChainState {
                nonce,
                ..Default::default()
            }),
            events: None,
        }
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn fail_nonce_reads(&self) {
        self.state.lock().unwrap().fail_nonce_reads = true;
    }

    /// Have another transaction from the sender mined just before the next
    /// contract creation
    pub fn interleave_foreign_tx_before_deploy(&self) {
        self.state.lock().unwrap().foreign_tx_pending = true;
    }

    /// Let the first `n` contract creations succeed and fail every later one
    pub fn fail_deploys_after(&self, n: usize) {
        self.state.lock().unwrap().deploys_before_failure = Some(n);
    }

    pub fn fail_transactions_to(&self, to: Address) {
        self.state.lock().unwrap().failing_targets.insert(to);
    }

    fn log(&self, event: String) {
        if let Some(events) = &self.events {
            events.push(event);
        }
    }
}

#[async_trait]
impl NonceSource for MockChain {
    async fn transaction_count(&self, account: Address) -> Result<u64, ScriptError> {
        let state = self.state.lock().unwrap();
        if state.fail_nonce_reads {
            return Err(ScriptError::NonceFetching("rpc unavailable".to_string()));
        }

        Ok(if account == self.sender { state.nonce } else { 0 })
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn chain_id(&self) -> Result<u64, ScriptError> {
        Ok(250)
    }

    async fn deploy(&self, creation_code: Bytes) -> Result<Address, ScriptError> {
        let address = {
            let mut state = self.state.lock().unwrap();
            if state
                .deploys_before_failure
                .is_some_and(|n| state.deploys >= n)
            {
                return Err(ScriptError::ContractDeployment("execution reverted".to_string()));
            }
            if state.foreign_tx_pending {
                state.foreign_tx_pending = false;
                state.nonce += 1;
            }

            let address = self.sender.create(state.nonce);
            state.nonce += 1;
            state.deploys += 1;
            state.calls.push(RecordedCall::Deploy {
                address,
                code: creation_code,
            });
            address
        };

        self.log(format!("deploy {address}"));
        Ok(address)
    }

    async fn transact(&self, to: Address, calldata: Bytes) -> Result<TxHash, ScriptError> {
        let nonce = {
            let mut state = self.state.lock().unwrap();
            if state.failing_targets.contains(&to) {
                return Err(ScriptError::ContractInteraction(format!(
                    "transaction to {to} reverted"
                )));
            }

            let nonce = state.nonce;
            state.nonce += 1;
            state.calls.push(RecordedCall::Transact { to, calldata });
            nonce
        };

        self.log(format!("transact {to}"));
        Ok(TxHash::with_last_byte(nonce as u8))
    }
}

/// The vault and strategy artifacts, with stub bytecode
pub struct MemoryArtifacts(HashMap<String, Artifact>);

impl MemoryArtifacts {
    pub fn beefy() -> Self {
        let address = |name: &str| json!({ "name": name, "type": "address" });
        let route = |name: &str| json!({ "name": name, "type": "address[]" });

        let vault = json!({
            "abi": [{
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    address("_strategy"),
                    { "name": "_name", "type": "string" },
                    { "name": "_symbol", "type": "string" },
                    { "name": "_approvalDelay", "type": "uint256" }
                ]
            }],
            "bytecode": { "object": "0x608060405234801561001057600080fd5b50" }
        });

        let strategy = json!({
            "abi": [{
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    address("_want"),
                    { "name": "_poolId", "type": "uint256" },
                    address("_chef"),
                    {
                        "name": "_commonAddresses",
                        "type": "tuple",
                        "components": [
                            address("vault"),
                            address("unirouter"),
                            address("keeper"),
                            address("strategist"),
                            address("beefyFeeRecipient"),
                            address("beefyFeeConfig")
                        ]
                    },
                    route("_outputToNativeRoute"),
                    route("_secondOutputToNativeRoute"),
                    route("_outputToLp0Route"),
                    route("_outputToLp1Route")
                ]
            }],
            "bytecode": "0x60806040523480156200001157600080fd5b50"
        });

        Self(HashMap::from([
            ("BeefyVaultV6".to_string(), Artifact::from_json(&vault).unwrap()),
            (
                "StrategySpookyV2LP".to_string(),
                Artifact::from_json(&strategy).unwrap(),
            ),
        ]))
    }
}

impl ArtifactStore for MemoryArtifacts {
    fn artifact(&self, contract_id: &str) -> Result<Artifact, ScriptError> {
        self.0
            .get(contract_id)
            .cloned()
            .ok_or_else(|| ScriptError::ArtifactParsing(format!("no artifact for {contract_id}")))
    }
}

/// A verifier that records every request and accepts all but selected addresses
#[derive(Default)]
pub struct RecordingVerifier {
    requests: Mutex<Vec<VerificationRequest>>,
    failing: HashSet<Address>,
    delay: Option<Duration>,
    events: Option<EventLog>,
}

impl RecordingVerifier {
    pub fn failing_for(mut self, address: Address) -> Self {
        self.failing.insert(address);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn requests(&self) -> Vec<VerificationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Verifier for RecordingVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&request.address) {
            return Err(ScriptError::Verification(format!(
                "bytecode mismatch for {}",
                request.address
            )));
        }

        if let Some(events) = &self.events {
            events.push(format!("verified {}", request.address));
        }
        Ok(())
    }
}

/// A subsidy registrar that records registered contracts
#[derive(Default)]
pub struct RecordingRegistrar {
    registered: Mutex<Vec<Address>>,
    events: Option<EventLog>,
}

impl RecordingRegistrar {
    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn registered(&self) -> Vec<Address> {
        self.registered.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubsidyRegistrar for RecordingRegistrar {
    async fn register(&self, contract: Address) -> Result<(), ScriptError> {
        self.registered.lock().unwrap().push(contract);
        if let Some(events) = &self.events {
            events.push(format!("subsidy {contract}"));
        }
        Ok(())
    }
}
