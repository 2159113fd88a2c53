//! Prediction of the addresses future contract creations will receive.
//!
//! A creation transaction from `sender` with nonce `n` deploys to
//! `keccak256(rlp([sender, n]))[12..]`. The prediction holds only while no
//! other transaction from the creator is broadcast before the creations it
//! describes; nothing here detects that.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use tracing::debug;

use crate::{
    chain::NonceSource,
    constants::{STRATEGY_NONCE_OFFSET, VAULT_NONCE_OFFSET},
    errors::ScriptError,
    types::PredictedAddresses,
};

/// The address a contract created by `creator` at `nonce` will have
pub fn contract_address_at(creator: Address, nonce: u64) -> Address {
    creator.create(nonce)
}

/// Compute, for each offset, the address the creator's `offset`-th next
/// contract creation will receive, counting from its current pending nonce
pub async fn predict<N: NonceSource + ?Sized>(
    nonces: &N,
    creator: Address,
    offsets: &[u64],
) -> Result<BTreeMap<u64, Address>, ScriptError> {
    let nonce = nonces.transaction_count(creator).await?;
    debug!(creator = %creator, nonce, "predicting creation addresses");

    offsets
        .iter()
        .map(|&offset| {
            let target = nonce.checked_add(offset).ok_or_else(|| {
                ScriptError::InvalidConfig(format!("nonce offset {offset} overflows"))
            })?;
            Ok((offset, contract_address_at(creator, target)))
        })
        .collect()
}

/// Predict the vault and strategy addresses for a deployment issuing the
/// vault creation first and the strategy creation second
pub async fn predict_pair<N: NonceSource + ?Sized>(
    nonces: &N,
    creator: Address,
) -> Result<PredictedAddresses, ScriptError> {
    let predicted = predict(nonces, creator, &[VAULT_NONCE_OFFSET, STRATEGY_NONCE_OFFSET]).await?;

    Ok(PredictedAddresses {
        vault: predicted[&VAULT_NONCE_OFFSET],
        strategy: predicted[&STRATEGY_NONCE_OFFSET],
    })
}
