//! Utilities for the deploy scripts.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
    str::FromStr,
};

use alloy::{
    network::Ethereum,
    primitives::B256,
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde::Serialize;
use serde_json::Value;
use tokio::process::Command;

use crate::{constants::MAX_BYTES32_STRING_LEN, errors::ScriptError};

/// Sets up a signing client for the deployer, reading in the private key and RPC url
pub fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<(DynProvider<Ethereum>, PrivateKeySigner), ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let url = parse_rpc_url(rpc_url)?;

    let provider = ProviderBuilder::new()
        .wallet(signer.clone())
        .connect_http(url);

    Ok((DynProvider::new(provider), signer))
}

/// Sets up a read-only client, used where no transaction is ever sent
pub fn setup_read_only_client(rpc_url: &str) -> Result<DynProvider<Ethereum>, ScriptError> {
    let url = parse_rpc_url(rpc_url)?;
    let provider = ProviderBuilder::new().connect_http(url);
    Ok(DynProvider::new(provider))
}

/// Parse an RPC url
fn parse_rpc_url(rpc_url: &str) -> Result<Url, ScriptError> {
    Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Read and parse a JSON file
pub fn read_json_file(file_path: &Path) -> Result<Value, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?;

    serde_json::from_str(&file_contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Write a record into the deployments file under the given key, creating
/// the file if it doesn't exist and leaving other entries in place
pub fn write_deployment_record<T: Serialize>(
    file_path: &Path,
    key: &str,
    record: &T,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    }
    let mut parsed_json = read_json_file(file_path)?;

    let entries = parsed_json.as_object_mut().ok_or_else(|| {
        ScriptError::WriteFile("deployments file is not a JSON object".to_string())
    })?;
    let record = serde_json::to_value(record).map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    entries.insert(key.to_string(), record);

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::WriteFile(e.to_string()))
}

/// Encode a short string into a `bytes32`: UTF-8 bytes, right-padded with zeros.
///
/// The string must leave room for a null terminator.
pub fn format_bytes32_string(s: &str) -> Result<B256, ScriptError> {
    let bytes = s.as_bytes();
    if bytes.len() > MAX_BYTES32_STRING_LEN {
        return Err(ScriptError::InvalidConfig(format!(
            "{s} is too long to encode as bytes32"
        )));
    }

    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(out))
}

/// Run a command to completion, returning its stdout.
///
/// A non-zero exit status is an error carrying the command's stderr.
pub async fn run_command(mut cmd: Command, err_msg: &str) -> Result<String, String> {
    let output = cmd.output().await.map_err(|e| format!("{err_msg}: {e}"))?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if output.status.success() {
        Ok(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!(
            "{err_msg} ({}): {}",
            output.status,
            stderr.trim()
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use alloy::primitives::{address, Address};

    use super::*;

    #[test]
    fn test_format_bytes32_string() {
        let encoded = format_bytes32_string("boo.eth").unwrap();

        assert_eq!(&encoded[..7], b"boo.eth");
        assert!(encoded[7..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_format_bytes32_string_too_long() {
        let long = "a".repeat(32);
        assert!(format_bytes32_string(&long).is_err());
        assert!(format_bytes32_string(&long[..31]).is_ok());
    }

    #[test]
    fn test_write_deployment_record_preserves_entries() {
        let path = env::temp_dir().join(format!("deployments-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);

        let vault: Address = address!("00000000000000000000000000000000000000a1");
        write_deployment_record(&path, "mooFirst", &serde_json::json!({ "vault": vault }))
            .unwrap();
        write_deployment_record(&path, "mooSecond", &serde_json::json!({ "vault": vault }))
            .unwrap();

        let written = read_json_file(&path).unwrap();
        assert!(written.get("mooFirst").is_some());
        assert_eq!(
            written["mooSecond"]["vault"].as_str().unwrap().to_lowercase(),
            format!("{vault:#x}")
        );

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_run_command_reports_failure() {
        let mut ok = Command::new("sh");
        ok.arg("-c").arg("echo done");
        assert_eq!(run_command(ok, "echo").await.unwrap().trim(), "done");

        let mut fail = Command::new("sh");
        fail.arg("-c").arg("echo boom >&2; exit 3");
        let err = run_command(fail, "failing command").await.unwrap_err();
        assert!(err.contains("boom"));
    }
}
