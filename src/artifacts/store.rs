//! Artifact directory lookup.
//!
//! Layout produced by the compile step:
//! ```text
//! artifacts/
//!     build-info/<id>.json
//!     contracts/SimpleVoting.sol/SimpleVoting.json
//!     contracts/SimpleVoting.sol/SimpleVoting.dbg.json   → ../../build-info/<id>.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::artifacts::factory::ContractFactory;
use crate::artifacts::types::{
    ArtifactError, ArtifactResult, BuildInfo, ContractArtifact, ContractId, DebugFile,
};

const BUILD_INFO_DIR: &str = "build-info";
const DEBUG_SUFFIX: &str = ".dbg.json";

/// Read-only view of a compiled artifacts directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the artifact file for a bare (`SimpleVoting`) or fully
    /// qualified (`contracts/SimpleVoting.sol:SimpleVoting`) name.
    pub fn artifact_path(&self, name: &str) -> ArtifactResult<PathBuf> {
        if let Some(id) = ContractId::parse_qualified(name) {
            let path = self
                .root
                .join(&id.source_name)
                .join(format!("{}.json", id.contract_name));
            return if path.is_file() {
                Ok(path)
            } else {
                Err(self.not_found(name))
            };
        }

        let file_name = format!("{}.json", name);
        let mut matches = Vec::new();
        self.collect_named(&self.root, &file_name, &mut matches)?;
        matches.sort();

        match matches.len() {
            0 => Err(self.not_found(name)),
            1 => Ok(matches.remove(0)),
            _ => Err(ArtifactError::Ambiguous {
                name: name.to_string(),
                candidates: matches
                    .iter()
                    .filter_map(|p| self.qualified_name(p))
                    .collect(),
            }),
        }
    }

    /// Load and parse a contract artifact.
    pub fn load_artifact(&self, name: &str) -> ArtifactResult<ContractArtifact> {
        let path = self.artifact_path(name)?;
        read_json(&path)
    }

    /// Build a contract factory from the named artifact.
    pub fn contract_factory(&self, name: &str) -> ArtifactResult<ContractFactory> {
        let artifact = self.load_artifact(name)?;
        tracing::debug!(
            contract = %artifact.id(),
            root = %self.root.display(),
            "Artifact loaded"
        );
        ContractFactory::from_artifact(artifact)
    }

    /// Load the build-info the contract was compiled in, via its debug file.
    pub fn build_info(&self, id: &ContractId) -> ArtifactResult<BuildInfo> {
        let artifact_dir = self.root.join(&id.source_name);
        let dbg_path = artifact_dir.join(format!("{}{}", id.contract_name, DEBUG_SUFFIX));
        let dbg: DebugFile = read_json(&dbg_path)?;

        let build_info_path = artifact_dir.join(&dbg.build_info);
        read_json(&build_info_path)
    }

    fn collect_named(&self, dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> ArtifactResult<()> {
        let entries = fs::read_dir(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ArtifactError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            // Symlinks are not followed; a linked directory cycle would never end.
            let file_type = entry.file_type().map_err(|source| ArtifactError::Io {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                if dir == self.root && entry.file_name() == BUILD_INFO_DIR {
                    continue;
                }
                self.collect_named(&path, file_name, out)?;
            } else if entry.file_name().to_str() == Some(file_name) {
                out.push(path);
            }
        }
        Ok(())
    }

    fn qualified_name(&self, artifact_path: &Path) -> Option<String> {
        let source = artifact_path.parent()?.strip_prefix(&self.root).ok()?;
        let contract = artifact_path.file_stem()?.to_str()?;
        let source = source
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Some(format!("{}:{}", source, contract))
    }

    fn not_found(&self, name: &str) -> ArtifactError {
        ArtifactError::NotFound {
            name: name.to_string(),
            root: self.root.clone(),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ArtifactResult<T> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
