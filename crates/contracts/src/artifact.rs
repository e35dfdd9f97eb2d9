use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    anyhow::{Context, Result, bail},
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        fs,
        path::{Path, PathBuf},
    },
};

/// Directory Hardhat stores compiler inputs/outputs in. It never contains
/// contract artifacts.
const BUILD_INFO_DIR: &str = "build-info";

/// A compiled contract in Hardhat's `hh-sol-artifact-1` format.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    #[serde(default)]
    pub source_name: Option<String>,
    pub abi: JsonAbi,
    /// Creation bytecode. Empty for interfaces and abstract contracts.
    pub bytecode: Bytes,
    /// Unresolved library placeholders in the creation bytecode.
    #[serde(default)]
    pub link_references: BTreeMap<String, serde_json::Value>,
}

impl ContractArtifact {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid contract artifact")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("could not read artifact {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }
}

/// Hardhat artifacts directory, usually `<project>/artifacts`.
#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loads the artifact of a contract by name.
    ///
    /// `name` is either a bare contract name like `CryptoDevToken`, which must
    /// be unique across all sources, or a fully qualified name like
    /// `contracts/CryptoDevToken.sol:CryptoDevToken`.
    pub fn load(&self, name: &str) -> Result<ContractArtifact> {
        let path = self.find(name)?;
        tracing::debug!(contract = name, path = %path.display(), "loading artifact");
        ContractArtifact::from_path(&path)
    }

    fn find(&self, name: &str) -> Result<PathBuf> {
        if let Some((source, contract)) = name.split_once(':') {
            let path = self.root.join(source).join(format!("{contract}.json"));
            if !path.is_file() {
                bail!("artifact for {name} not found at {}", path.display());
            }
            return Ok(path);
        }

        let file_name = format!("{name}.json");
        let mut found = Vec::new();
        collect(&self.root, &file_name, &mut found)
            .with_context(|| format!("could not search {}", self.root.display()))?;
        match found.len() {
            0 => bail!(
                "artifact for contract {name} not found in {}, has it been compiled?",
                self.root.display()
            ),
            1 => Ok(found.remove(0)),
            _ => bail!(
                "multiple artifacts for contract {name}, use a fully qualified name: {}",
                found
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

fn collect(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if entry.file_name() != BUILD_INFO_DIR {
                collect(&path, file_name, found)?;
            }
        } else if entry.file_name() == file_name {
            found.push(path);
        }
    }
    Ok(())
}
