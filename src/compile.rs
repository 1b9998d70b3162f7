use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use ethers::{abi::Abi, types::Bytes};
use ethers_solc::{
    artifacts::StandardJsonCompilerInput, Artifact, Project, ProjectPathsConfig,
};
use eyre::{eyre, ContextCompat, Result};
use tracing::debug;

/// Deployable output of a single contract.
#[derive(Debug, Clone)]
pub struct CompiledContract {
    pub name: String,
    /// Absolute path of the source file declaring the contract.
    pub source: PathBuf,
    /// Full solc version, e.g. `0.8.19+commit.7dd6d404.Linux.g++`.
    pub compiler_version: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

pub struct CompiledContracts {
    project: Project,
    contracts: BTreeMap<String, CompiledContract>,
}

impl CompiledContracts {
    pub fn get(&self, name: &str) -> Result<&CompiledContract> {
        self.contracts
            .get(name)
            .with_context(|| format!("Contract {name} not found in compiled project"))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    pub fn root(&self) -> &Path {
        self.project.root()
    }

    /// Standard JSON input holding `contract` and everything it imports.
    pub fn standard_json_input(
        &self,
        contract: &CompiledContract,
    ) -> Result<StandardJsonCompilerInput> {
        Ok(self.project.standard_json_input(&contract.source)?)
    }

    /// `<relative source>:<name>`, the fully qualified name block explorers expect.
    pub fn qualified_name(&self, contract: &CompiledContract) -> String {
        let source = contract
            .source
            .strip_prefix(self.root())
            .unwrap_or(&contract.source);
        format!("{}:{}", source.display(), contract.name)
    }

    pub fn optimizer(&self) -> (bool, Option<usize>) {
        let optimizer = &self.project.solc_config.settings.optimizer;
        (optimizer.enabled.unwrap_or_default(), optimizer.runs)
    }

    /// Logs the constructor and functions of every compiled contract.
    pub fn log_artifacts(&self) {
        for contract in self.contracts.values() {
            debug!("{}", "=".repeat(80));
            debug!("CONTRACT: {:?}", contract.name);

            if let Some(constructor) = contract.abi.constructor() {
                debug!("CONSTRUCTOR args: {:?}", constructor.inputs);
            }
            for func in contract.abi.functions() {
                let name = &func.name;
                let params = &func.inputs;
                debug!("FUNCTION {name} {params:?}");
            }
        }
    }
}

/// Compiles every Solidity source under `root`.
pub async fn compile(root: impl AsRef<Path>) -> Result<CompiledContracts> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(eyre!("Project root {root:?} does not exist!"));
    }
    let root = std::fs::canonicalize(root)?;

    let paths = ProjectPathsConfig::builder()
        .root(&root)
        .sources(&root)
        .build()?;

    let project = Project::builder()
        .paths(paths)
        .set_auto_detect(true)
        .ephemeral()
        .no_artifacts()
        .build()?;

    let output = project.compile()?;

    if output.has_compiler_errors() {
        return Err(eyre!(
            "Compiling solidity project failed: {:?}",
            output.output().errors
        ));
    }

    let mut contracts = BTreeMap::new();
    for (id, artifact) in output.into_artifacts() {
        let (abi, bytecode, _) = artifact.into_parts();
        let abi = abi.with_context(|| format!("Missing abi from contract {}", id.name))?;
        // interfaces and internal-only libraries
        let Some(bytecode) = bytecode.filter(|code| !code.is_empty()) else {
            continue;
        };
        contracts.insert(
            id.name.clone(),
            CompiledContract {
                name: id.name,
                source: id.source,
                compiler_version: id.version.to_string(),
                abi,
                bytecode,
            },
        );
    }

    Ok(CompiledContracts { project, contracts })
}
