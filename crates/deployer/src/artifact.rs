//! Compiled contract artifacts.
//!
//! Artifacts are the JSON files a Solidity toolchain writes next to the
//! sources it compiles. Both the Hardhat layout
//! (`artifacts/contracts/Foo.sol/Foo.json`, bytecode as a hex string) and the
//! Foundry layout (`out/Foo.sol/Foo.json`, bytecode as `{ "object": .. }`)
//! are understood.

use {
    crate::error::DeploymentError,
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
        json_abi::JsonAbi,
        primitives::Bytes,
    },
    serde::Deserialize,
    std::path::{Path, PathBuf},
};

/// A compiled contract ready to be deployed.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
struct ArtifactFile {
    abi: JsonAbi,
    bytecode: Bytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Bytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

impl From<Bytecode> for Bytes {
    fn from(bytecode: Bytecode) -> Self {
        match bytecode {
            Bytecode::Hex(bytes) | Bytecode::Object { object: bytes } => bytes,
        }
    }
}

impl ContractArtifact {
    pub fn from_json(name: &str, json: &str) -> Result<Self, DeploymentError> {
        let file: ArtifactFile = serde_json::from_str(json)
            .map_err(|err| DeploymentError::malformed_artifact(name, err))?;
        Ok(Self {
            name: name.to_string(),
            abi: file.abi,
            bytecode: file.bytecode.into(),
        })
    }

    /// Builds the creation code for this contract: its bytecode followed by
    /// the ABI encoded constructor arguments.
    ///
    /// Every argument is parsed against the type the constructor declares
    /// for it, so passing e.g. a bare number where an `address` is expected
    /// is rejected here instead of producing a bogus deployment.
    pub fn init_code(&self, args: &[String]) -> Result<Bytes, DeploymentError> {
        if self.bytecode.is_empty() {
            return Err(DeploymentError::invalid_invocation(
                &self.name,
                "artifact has no creation bytecode (interface or abstract contract?)",
            ));
        }

        let inputs = self
            .abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default();
        if inputs.len() != args.len() {
            return Err(DeploymentError::invalid_invocation(
                &self.name,
                format!(
                    "constructor takes {} argument(s) but {} were given",
                    inputs.len(),
                    args.len()
                ),
            ));
        }
        let Some(constructor) = &self.abi.constructor else {
            return Ok(self.bytecode.clone());
        };

        let values = inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let ty = param.resolve().map_err(|err| {
                    DeploymentError::malformed_artifact(&self.name, format!("{}: {err}", param.ty))
                })?;
                ty.coerce_str(arg).map_err(|err| {
                    DeploymentError::invalid_invocation(
                        &self.name,
                        format!("argument {:?} is not a valid {}: {err}", arg, param.ty),
                    )
                })
            })
            .collect::<Result<Vec<DynSolValue>, _>>()?;
        let encoded = constructor
            .abi_encode_input(&values)
            .map_err(|err| DeploymentError::invalid_invocation(&self.name, err))?;

        let mut code = self.bytecode.to_vec();
        code.extend(encoded);
        Ok(code.into())
    }
}

/// Looks up artifacts by contract name below a root directory.
#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, name: &str) -> Result<ContractArtifact, DeploymentError> {
        validate_name(name)?;
        let path = self.locate(name)?;
        tracing::debug!(?path, "resolved artifact for {name}");
        let json = std::fs::read_to_string(&path).map_err(|err| {
            DeploymentError::malformed_artifact(name, format!("{}: {err}", path.display()))
        })?;
        ContractArtifact::from_json(name, &json)
    }

    fn locate(&self, name: &str) -> Result<PathBuf, DeploymentError> {
        let file_name = format!("{name}.json");
        let direct = self.root.join(&file_name);
        if direct.is_file() {
            return Ok(direct);
        }

        let mut found = Vec::new();
        search(&self.root, &file_name, &mut found);
        match found.len() {
            0 => Err(DeploymentError::UnknownContract(name.to_string())),
            1 => Ok(found.remove(0)),
            _ => {
                found.sort();
                let paths = found
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(DeploymentError::malformed_artifact(
                    name,
                    format!("ambiguous artifact name, candidates: {paths}"),
                ))
            }
        }
    }
}

fn search(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        // Symbolic links are not followed, a link cycle would never end.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if entry.file_name() != "build-info" {
                search(&entry.path(), file_name, found);
            }
        } else if entry.file_name() == file_name {
            found.push(entry.path());
        }
    }
}

/// Contract names have to be Solidity identifiers. This also keeps names
/// from being interpreted as paths.
fn validate_name(name: &str) -> Result<(), DeploymentError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(DeploymentError::invalid_invocation(
            name,
            "contract name must be a non-empty Solidity identifier",
        ))
    }
}
