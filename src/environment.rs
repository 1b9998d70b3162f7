use std::{env, path::PathBuf, process::Command, sync::Arc, time::Duration};

use ethers::{
    contract::Contract,
    middleware::SignerMiddleware,
    prelude::{LocalWallet, Signer},
    signers::{coins_bip39::English, MnemonicBuilder},
    types::Address,
    utils::{Ganache, GanacheInstance},
};
use ethers_providers::{Http, Middleware, Provider};
use eyre::{eyre, ContextCompat, Result};
use hex::ToHex;
use tracing::{debug, info};

use crate::{
    deployments::Deployments,
    network::{Accounts, NetworkConfig, Rpc, GANACHE_MNEMONIC},
};

/// Binary spawned for the `hardhat` network.
pub const GANACHE_BINARY: &str = "ganache";

pub type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

pub type SignerDeployedContract = Contract<Client>;

/// Filesystem locations and credentials shared by the binaries and tests.
#[derive(Debug, Clone)]
pub struct Settings {
    pub contracts_root: PathBuf,
    pub deployments_root: PathBuf,
    pub etherscan_api_key: Option<String>,
}

impl Settings {
    /// Paths relative to the working directory, explorer key from `ETHERSCAN_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            contracts_root: PathBuf::from("contracts"),
            deployments_root: PathBuf::from("deployments"),
            etherscan_api_key: env::var("ETHERSCAN_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
        }
    }
}

/// A connected network: provider, signing accounts and deployment records.
pub struct Environment {
    pub network: NetworkConfig,
    pub settings: Settings,
    pub deployments: Deployments,
    provider: Provider<Http>,
    accounts: Vec<LocalWallet>,
    // keeps the spawned node alive
    _ganache: Option<GanacheInstance>,
}

impl Environment {
    pub async fn connect(network: NetworkConfig, settings: Settings) -> Result<Self> {
        let (endpoint, ganache) = match &network.rpc {
            Rpc::Ganache => {
                // spawn() panics on a missing binary
                ensure_installed(GANACHE_BINARY)?;

                // Create and launch a Ganache instance with the configured chain id
                let ganache = Ganache::new()
                    .mnemonic(GANACHE_MNEMONIC)
                    .arg("--chain.chainId")
                    .arg(network.chain_id.to_string())
                    .spawn();
                info!("HTTP Endpoint: {}", ganache.endpoint());
                (ganache.endpoint(), Some(ganache))
            }
            Rpc::Url(url) => (url.clone(), None),
        };

        let interval = if network.is_development() {
            Duration::from_millis(10)
        } else {
            Duration::from_secs(2)
        };
        // Connect to the node, polling fast only on local chains
        let provider = Provider::<Http>::try_from(endpoint.as_str())?.interval(interval);

        // The node must agree with the chain id the network is configured for
        let chain_id = provider.get_chainid().await?.as_u64();
        if chain_id != network.chain_id {
            return Err(eyre!(
                "network {} expects chain id {} but the node reports {chain_id}",
                network.name,
                network.chain_id
            ));
        }
        info!("Connected to {} with chain id {}", network.name, chain_id);

        // Bind every signing account to the chain id (EIP-155)
        let accounts = wallets(&network.accounts, ganache.as_ref())?
            .into_iter()
            .map(|wallet| wallet.with_chain_id(chain_id))
            .collect::<Vec<_>>();
        let deployer = accounts.first().context("network has no accounts")?;
        debug!(
            "deployer address: 0x{}",
            deployer.address().encode_hex::<String>()
        );

        // Ephemeral chains start with an empty registry
        let deployments = if network.is_persistent() {
            Deployments::load(&settings.deployments_root, &network.name)?
        } else {
            Deployments::in_memory()
        };

        Ok(Self {
            network,
            settings,
            deployments,
            provider,
            accounts,
            _ganache: ganache,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.network.chain_id
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    pub fn accounts(&self) -> &[LocalWallet] {
        &self.accounts
    }

    /// Signing client for account `index`.
    pub fn signer(&self, index: usize) -> Result<Arc<Client>> {
        let wallet = self
            .accounts
            .get(index)
            .with_context(|| format!("no account at index {index}"))?
            .clone();
        Ok(Arc::new(SignerMiddleware::new(self.provider.clone(), wallet)))
    }

    pub fn deployer(&self) -> Result<Arc<Client>> {
        self.signer(0)
    }

    pub fn deployer_address(&self) -> Result<Address> {
        Ok(self.deployer()?.address())
    }

    /// Handle to the deployment named `name`, signing with `signer`.
    pub fn get_contract(&self, name: &str, signer: Arc<Client>) -> Result<SignerDeployedContract> {
        let deployment = self.deployments.get(name)?;
        Ok(Contract::new(
            deployment.address,
            deployment.abi.clone(),
            signer,
        ))
    }
}

/// Fails unless `program --version` runs successfully.
pub fn ensure_installed(program: &str) -> Result<()> {
    let installed = Command::new(program)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);
    if installed {
        Ok(())
    } else {
        Err(eyre!("{program} is not installed or not on the PATH"))
    }
}

fn wallets(accounts: &Accounts, ganache: Option<&GanacheInstance>) -> Result<Vec<LocalWallet>> {
    let wallets = match accounts {
        Accounts::Ganache => ganache
            .context("ganache accounts requested without a ganache node")?
            .keys()
            .iter()
            .map(|key| LocalWallet::from(key.clone()))
            .collect(),
        Accounts::Mnemonic { phrase, count } => (0..*count)
            .map(|index| {
                Ok(MnemonicBuilder::<English>::default()
                    .phrase(phrase.as_str())
                    .index(index)?
                    .build()?)
            })
            .collect::<Result<Vec<_>>>()?,
        Accounts::PrivateKeys(keys) => keys
            .iter()
            .map(|key| Ok(key.trim_start_matches("0x").parse::<LocalWallet>()?))
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(wallets)
}
