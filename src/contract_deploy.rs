use std::path::PathBuf;

use clap::Parser;
use ethers::prelude::Middleware;
use eyre::Result;
use fund_me_deploy::{
    compile::compile, deploy, network::NetworkConfig, Environment, Settings,
};
use hex::ToHex;
use tracing::info;

/// Deploys FundMe together with the price feed it depends on.
#[derive(Debug, Parser)]
#[command(name = "deploy")]
struct Cli {
    /// Network to deploy to: hardhat, localhost, goerli or polygon.
    #[arg(long, env = "FUND_ME_NETWORK", default_value = "hardhat")]
    network: String,

    /// Only run the steps carrying one of these tags (all, mocks, fundme).
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    #[arg(long, default_value = "contracts")]
    contracts: PathBuf,

    #[arg(long, default_value = "deployments")]
    deployments: PathBuf,

    /// Enables source verification on public networks.
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    etherscan_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    fund_me_deploy::init_tracing();
    let cli = Cli::parse();

    let network = NetworkConfig::named(&cli.network)?;
    let settings = Settings {
        contracts_root: cli.contracts,
        deployments_root: cli.deployments,
        etherscan_api_key: cli.etherscan_api_key.filter(|key| !key.is_empty()),
    };
    let mut env = Environment::connect(network, settings).await?;

    let contracts = compile(&env.settings.contracts_root).await?;
    contracts.log_artifacts();

    let deployer = env.deployer_address()?;
    let balance = env.provider().get_balance(deployer, None).await?;
    info!(
        "Deployer 0x{} balance: {}",
        deployer.encode_hex::<String>(),
        balance
    );

    deploy::run(&mut env, &contracts, &cli.tags).await?;

    Ok(())
}
