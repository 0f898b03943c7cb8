//! Contract factory: ABI plus creation bytecode, ready to produce deploy code.

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::hex;
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;

use crate::artifacts::types::{ArtifactError, ArtifactResult, ContractArtifact, ContractId};

/// Deployable form of one compiled contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    id: ContractId,
    abi: JsonAbi,
    bytecode: Bytes,
}

impl ContractFactory {
    pub fn new(id: ContractId, abi: JsonAbi, bytecode: Bytes) -> Self {
        Self { id, abi, bytecode }
    }

    /// Build a factory from a compiled artifact.
    ///
    /// Rejects artifacts that still carry library placeholders or have no
    /// creation code.
    pub fn from_artifact(artifact: ContractArtifact) -> ArtifactResult<Self> {
        let id = artifact.id();

        let libraries = artifact.unlinked_libraries();
        if !libraries.is_empty() {
            return Err(ArtifactError::UnlinkedLibraries {
                contract: id.to_string(),
                libraries,
            });
        }

        let bytecode = hex::decode(artifact.bytecode.trim()).map_err(|e| ArtifactError::InvalidBytecode {
            contract: id.to_string(),
            reason: e.to_string(),
        })?;
        if bytecode.is_empty() {
            return Err(ArtifactError::NotDeployable(id.to_string()));
        }

        Ok(Self::new(id, artifact.abi, Bytes::from(bytecode)))
    }

    pub fn id(&self) -> &ContractId {
        &self.id
    }

    /// ABI-encode constructor arguments, type-checked against the constructor.
    pub fn encode_constructor_args(&self, args: &[DynSolValue]) -> ArtifactResult<Bytes> {
        let encoded = match &self.abi.constructor {
            Some(constructor) => constructor
                .abi_encode_input(args)
                .map_err(|e| self.encoding_error(e.to_string()))?,
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(self.encoding_error(format!(
                    "contract has no constructor but {} argument(s) were given",
                    args.len()
                )))
            }
        };
        Ok(Bytes::from(encoded))
    }

    /// Creation bytecode followed by the encoded constructor arguments.
    pub fn deploy_code(&self, args: &[DynSolValue]) -> ArtifactResult<Bytes> {
        let encoded = self.encode_constructor_args(args)?;
        let mut code = Vec::with_capacity(self.bytecode.len() + encoded.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&encoded);
        Ok(Bytes::from(code))
    }

    fn encoding_error(&self, reason: String) -> ArtifactError {
        ArtifactError::Encoding {
            contract: self.id.to_string(),
            reason,
        }
    }
}
