//! Scripts for deploying and configuring a vault and its strategy.

#![deny(missing_docs)]
#![cfg_attr(not(test), deny(clippy::missing_docs_in_private_items))]

pub mod address_book;
pub mod artifacts;
pub mod chain;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod deploy;
pub mod errors;
pub mod pipeline;
pub mod predict;
mod solidity;
pub mod subsidy;
pub mod types;
pub mod utils;
pub mod validation;
pub mod verification;

#[cfg(test)]
mod test_helpers;
