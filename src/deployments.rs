//! Deploys compiled contracts and keeps track of where they landed.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use ethers::{
    abi::{Abi, Token},
    contract::ContractFactory,
    types::{Address, Bytes, TxHash, U256},
};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{compile::CompiledContract, environment::Client};

/// Where a contract was deployed and how to talk to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: Address,
    pub abi: Abi,
    pub transaction_hash: Option<TxHash>,
    /// ABI-encoded constructor arguments.
    pub args: Bytes,
    pub gas_used: Option<U256>,
}

#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub args: Vec<Token>,
    pub confirmations: usize,
}

/// Named deployments of one network. Records are mirrored to
/// `<root>/<network>/<Name>.json` when a directory is attached.
#[derive(Debug, Default)]
pub struct Deployments {
    dir: Option<PathBuf>,
    records: BTreeMap<String, Deployment>,
}

impl Deployments {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the records saved for `network` under `root`.
    pub fn load(root: &Path, network: &str) -> Result<Self> {
        let dir = root.join(network);
        let mut records = BTreeMap::new();
        if dir.exists() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };
                let raw = fs::read_to_string(&path)?;
                let deployment: Deployment = serde_json::from_str(&raw)
                    .wrap_err_with(|| format!("malformed deployment record {path:?}"))?;
                debug!("loaded deployment {name} at {:?}", deployment.address);
                records.insert(name.to_string(), deployment);
            }
        }
        Ok(Self {
            dir: Some(dir),
            records,
        })
    }

    pub fn get(&self, name: &str) -> Result<&Deployment> {
        self.records
            .get(name)
            .ok_or_else(|| eyre!("no deployment named {name}"))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Registers `deployment` under `name`, writing it out if persistent.
    pub fn save(&mut self, name: &str, deployment: Deployment) -> Result<()> {
        if let Some(dir) = &self.dir {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("{name}.json"));
            fs::write(&path, serde_json::to_string_pretty(&deployment)?)
                .wrap_err_with(|| format!("failed to write {path:?}"))?;
        }
        self.records.insert(name.to_string(), deployment);
        Ok(())
    }

    /// Deploys `contract` and registers it as `name`.
    pub async fn deploy(
        &mut self,
        name: &str,
        contract: &CompiledContract,
        client: Arc<Client>,
        options: DeployOptions,
    ) -> Result<Deployment> {
        // Keep the encoded constructor arguments for verification
        let args: Bytes = ethers::abi::encode(&options.args).into();

        // Create the factory from the compiled abi and bytecode
        let factory = ContractFactory::new(contract.abi.clone(), contract.bytecode.clone(), client);
        let deployer = factory
            .deploy_tokens(options.args)?
            .confirmations(options.confirmations)
            .legacy();

        // Send the deployment and wait for the requested confirmations
        let (instance, receipt) = deployer.send_with_receipt().await?;
        let deployment = Deployment {
            address: instance.address(),
            abi: contract.abi.clone(),
            transaction_hash: Some(receipt.transaction_hash),
            args,
            gas_used: receipt.gas_used,
        };
        info!(
            "deploying \"{name}\" (tx: {:?})...: deployed at {:?} with {} gas",
            receipt.transaction_hash,
            deployment.address,
            receipt.gas_used.unwrap_or_default()
        );

        // Register for later lookups by name
        self.save(name, deployment.clone())?;
        Ok(deployment)
    }
}
