//! Read-only reference data: tokens and platform addresses per network

use std::{collections::HashMap, path::Path, str::FromStr};

use alloy::primitives::Address;
use serde::Deserialize;

use crate::{
    constants::{FEE_PLATFORM_KEY, WRAPPED_NATIVE_TOKEN_KEY},
    errors::ScriptError,
    utils::read_json_file,
};

/// A token listed in the address book
#[derive(Clone, Debug, Deserialize)]
pub struct TokenEntry {
    /// The token contract address
    pub address: Address,
}

/// The addresses a platform publishes for a network.
///
/// Only the fields this tool consumes are named, others are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAddresses {
    /// The keeper allowed to manage strategies
    pub keeper: Option<Address>,
    /// The recipient of platform fees
    pub beefy_fee_recipient: Option<Address>,
    /// The fee configurator contract
    pub beefy_fee_config: Option<Address>,
    /// The governance address that takes ownership of new vaults
    pub vault_owner: Option<Address>,
    /// The gas subsidy registry contract
    pub subsidy_registry: Option<Address>,
}

/// The address book entry of a single network
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBookNetwork {
    /// The chain id of the network
    pub chain_id: u64,
    /// Tokens keyed by symbol
    #[serde(default)]
    pub tokens: HashMap<String, TokenEntry>,
    /// Platforms keyed by name
    #[serde(default)]
    pub platforms: HashMap<String, PlatformAddresses>,
}

impl AddressBookNetwork {
    /// The platform supplying keeper, fee and governance addresses
    pub fn fee_platform(&self) -> Option<&PlatformAddresses> {
        self.platforms.get(FEE_PLATFORM_KEY)
    }

    /// Look up a token address by symbol
    pub fn token(&self, symbol: &str) -> Option<Address> {
        self.tokens.get(symbol).map(|t| t.address)
    }

    /// The wrapped native token of the network
    pub fn wrapped_native(&self) -> Option<Address> {
        self.token(WRAPPED_NATIVE_TOKEN_KEY)
    }

    /// Resolve a value that is either a hex address or a token symbol
    pub fn resolve(&self, value: &str) -> Result<Address, ScriptError> {
        if value.starts_with("0x") {
            return Address::from_str(value)
                .map_err(|e| ScriptError::InvalidConfig(format!("{value}: {e}")));
        }

        self.token(value)
            .ok_or_else(|| ScriptError::InvalidConfig(format!("unknown token symbol {value}")))
    }

    /// Resolve every hop of a swap route
    pub fn resolve_route(&self, hops: &[String]) -> Result<Vec<Address>, ScriptError> {
        hops.iter().map(|hop| self.resolve(hop)).collect()
    }
}

/// The address book, keyed by network name
#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    /// Networks keyed by name
    networks: HashMap<String, AddressBookNetwork>,
}

impl AddressBook {
    /// Read the address book at the given path
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let value = read_json_file(path)?;
        serde_json::from_value(value).map_err(|e| ScriptError::ReadFile(e.to_string()))
    }

    /// The entry of the given network
    pub fn network(&self, name: &str) -> Result<&AddressBookNetwork, ScriptError> {
        self.networks.get(name).ok_or_else(|| {
            ScriptError::InvalidConfig(format!("network {name} not found in address book"))
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const ADDRESS_BOOK: &str = r#"{
        "fantom": {
            "chainId": 250,
            "tokens": {
                "WFTM": { "address": "0x21be370D5312f44cB42ce377BC9b8a0cEF1A4C83" },
                "WNATIVE": { "address": "0x21be370D5312f44cB42ce377BC9b8a0cEF1A4C83", "symbol": "WFTM" }
            },
            "platforms": {
                "beefyfinance": {
                    "vaultOwner": "0x847298aC8C28A9D66859E750456b92C2A67b876D",
                    "treasury": "0xe6CcE165Aa3e52B2cC55F17b1dBC6A8fe5D66610"
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_address_book() {
        let book: AddressBook = serde_json::from_str(ADDRESS_BOOK).unwrap();
        let fantom = book.network("fantom").unwrap();

        assert_eq!(fantom.chain_id, 250);
        assert_eq!(
            fantom.wrapped_native(),
            Some(address!("21be370D5312f44cB42ce377BC9b8a0cEF1A4C83"))
        );
        assert_eq!(
            fantom.fee_platform().unwrap().vault_owner,
            Some(address!("847298aC8C28A9D66859E750456b92C2A67b876D"))
        );
        assert!(fantom.fee_platform().unwrap().keeper.is_none());
    }

    #[test]
    fn test_unknown_network() {
        let book: AddressBook = serde_json::from_str(ADDRESS_BOOK).unwrap();
        assert!(matches!(
            book.network("polygon"),
            Err(ScriptError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_resolve_hex_and_symbol() {
        let book: AddressBook = serde_json::from_str(ADDRESS_BOOK).unwrap();
        let fantom = book.network("fantom").unwrap();

        assert_eq!(fantom.resolve("WFTM").unwrap(), fantom.wrapped_native().unwrap());
        assert_eq!(
            fantom
                .resolve("0xDE1E704dae0B4051e80DAbB26ab6ad6c12262DA0")
                .unwrap(),
            address!("DE1E704dae0B4051e80DAbB26ab6ad6c12262DA0")
        );
        assert!(fantom.resolve("0x1234").is_err());
    }
}
