use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ethers::utils::{format_ether, parse_ether};
use eyre::Result;
use fund_me_deploy::{fund_me::FundMe, network::NetworkConfig, Environment, Settings};
use tracing::info;

/// Funds or drains an already deployed FundMe contract.
#[derive(Debug, Parser)]
#[command(name = "transact")]
struct Cli {
    #[arg(long, env = "FUND_ME_NETWORK", default_value = "localhost")]
    network: String,

    #[arg(long, default_value = "deployments")]
    deployments: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sends `value` ETH to the contract.
    Fund {
        #[arg(long, default_value = "0.1")]
        value: String,
    },
    /// Withdraws everything as the owner.
    Withdraw,
    /// Prints the contract balance.
    Balance,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    fund_me_deploy::init_tracing();
    let cli = Cli::parse();

    let network = NetworkConfig::named(&cli.network)?;
    let settings = Settings {
        deployments_root: cli.deployments,
        ..Settings::from_env()
    };
    let env = Environment::connect(network, settings).await?;
    let fund_me = FundMe::deployed(&env, env.deployer()?)?;
    info!("Got contract FundMe at {:?}", fund_me.address());

    match cli.command {
        Command::Fund { value } => {
            info!("Funding contract...");
            let receipt = fund_me.fund(parse_ether(&value)?).await?;
            info!(
                "Funded! TX mined in block {:?}",
                receipt.block_number.unwrap_or_default()
            );
        }
        Command::Withdraw => {
            info!("Withdrawing from contract...");
            fund_me.withdraw().await?;
            info!("Got it back!");
        }
        Command::Balance => {}
    }

    info!(
        "Contract balance: {} ETH",
        format_ether(fund_me.balance().await?)
    );
    Ok(())
}
