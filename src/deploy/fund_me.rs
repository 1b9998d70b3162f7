use ethers::{abi::Token, types::Address};
use eyre::Result;
use tracing::info;

use super::{FUND_ME, MOCK_V3_AGGREGATOR};
use crate::{
    compile::CompiledContracts,
    deployments::{DeployOptions, Deployment},
    environment::Environment,
    helper_config::network_config,
    verify::verify,
};

/// Price feed FundMe is constructed with: the mock on development chains,
/// the configured feed everywhere else.
pub fn price_feed_address(env: &Environment) -> Result<Address> {
    if env.network.is_development() {
        Ok(env.deployments.get(MOCK_V3_AGGREGATOR)?.address)
    } else {
        network_config(env.chain_id())?.price_feed_address()
    }
}

pub async fn deploy_fund_me(env: &mut Environment, contracts: &CompiledContracts) -> Result<Deployment> {
    let price_feed = price_feed_address(env)?;
    let deployer = env.deployer()?;
    let fund_me = contracts.get(FUND_ME)?;

    let deployment = env
        .deployments
        .deploy(
            FUND_ME,
            fund_me,
            deployer,
            DeployOptions {
                args: vec![Token::Address(price_feed)],
                confirmations: env.network.confirmations(),
            },
        )
        .await?;

    if !env.network.is_development() {
        if let Some(api_key) = &env.settings.etherscan_api_key {
            verify(api_key, env.chain_id(), contracts, fund_me, &deployment).await;
        }
    }

    info!("{}", "-".repeat(44));
    Ok(deployment)
}
