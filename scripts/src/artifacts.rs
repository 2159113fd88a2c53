//! The build artifact boundary: resolving a contract identifier to its ABI and bytecode

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::DynSolValue,
    json_abi::JsonAbi,
    primitives::{hex, Bytes},
};
use serde_json::Value;

use crate::{
    constants::ARTIFACT_EXTENSION, errors::ScriptError, types::encode_constructor_args,
    utils::read_json_file,
};

/// A compiled contract
#[derive(Clone, Debug)]
pub struct Artifact {
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact in either the Foundry or the Hardhat layout
    pub fn from_json(value: &Value) -> Result<Self, ScriptError> {
        let abi: JsonAbi = serde_json::from_value(value["abi"].clone())
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        // Foundry nests the bytecode under `object`, Hardhat stores it directly
        let bytecode_hex = value["bytecode"]["object"]
            .as_str()
            .or_else(|| value["bytecode"].as_str())
            .ok_or_else(|| ScriptError::ArtifactParsing("artifact has no bytecode".to_string()))?;
        let bytecode: Bytes = hex::decode(bytecode_hex)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
            .into();

        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(
                "artifact bytecode is empty, is the contract abstract?".to_string(),
            ));
        }

        Ok(Self { abi, bytecode })
    }

    /// The creation code for the given constructor arguments
    pub fn creation_code(&self, args: &[DynSolValue]) -> Result<Bytes, ScriptError> {
        if let Some(constructor) = &self.abi.constructor {
            if constructor.inputs.len() != args.len() {
                return Err(ScriptError::CalldataConstruction(format!(
                    "constructor takes {} arguments, {} given",
                    constructor.inputs.len(),
                    args.len()
                )));
            }
        }

        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(&encode_constructor_args(args));
        Ok(code.into())
    }
}

/// Resolves contract identifiers to compiled artifacts
pub trait ArtifactStore: Send + Sync {
    /// Look up the artifact of the given contract
    fn artifact(&self, contract_id: &str) -> Result<Artifact, ScriptError>;
}

/// An [`ArtifactStore`] reading a build output directory.
///
/// The directory is searched recursively for `<contract_id>.json`, which
/// matches both `out/<File>.sol/<Contract>.json` and
/// `artifacts/contracts/**/<Contract>.json`.
#[derive(Clone, Debug)]
pub struct FileArtifactStore {
    /// The build output directory
    root: PathBuf,
}

impl FileArtifactStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Depth-first search for `file_name`, files of a directory before its subdirectories
    fn find(&self, dir: &Path, file_name: &str) -> Result<Option<PathBuf>, ScriptError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))?;

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ScriptError::ReadFile(e.to_string()))?.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if path.file_name().is_some_and(|name| name == file_name) {
                return Ok(Some(path));
            }
        }

        for subdir in subdirs {
            if let Some(found) = self.find(&subdir, file_name)? {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }
}

impl ArtifactStore for FileArtifactStore {
    fn artifact(&self, contract_id: &str) -> Result<Artifact, ScriptError> {
        let file_name = format!("{contract_id}.{ARTIFACT_EXTENSION}");
        let path = self.find(&self.root, &file_name)?.ok_or_else(|| {
            ScriptError::ArtifactParsing(format!(
                "no artifact for {} under {}",
                contract_id,
                self.root.display()
            ))
        })?;

        Artifact::from_json(&read_json_file(&path)?)
    }
}
