use ethers::{
    abi::Token,
    types::{I256, U256},
};
use eyre::Result;
use tracing::info;

use super::MOCK_V3_AGGREGATOR;
use crate::{
    compile::CompiledContracts,
    deployments::{DeployOptions, Deployment},
    environment::Environment,
    helper_config::{DECIMALS, INITIAL_ANSWER, LOCAL_CHAIN_ID},
};

/// Constructor arguments of the mock price feed.
pub fn mock_args() -> Vec<Token> {
    vec![
        Token::Uint(U256::from(DECIMALS)),
        Token::Int(I256::from(INITIAL_ANSWER).into_raw()),
    ]
}

/// Deploys a stand-in price feed when running against the local chain.
pub async fn deploy_mocks(
    env: &mut Environment,
    contracts: &CompiledContracts,
) -> Result<Option<Deployment>> {
    if env.chain_id() != LOCAL_CHAIN_ID {
        return Ok(None);
    }

    info!("Local network detected! Deploying mocks...");
    let deployer = env.deployer()?;
    let mock = contracts.get(MOCK_V3_AGGREGATOR)?;
    let deployment = env
        .deployments
        .deploy(
            MOCK_V3_AGGREGATOR,
            mock,
            deployer,
            DeployOptions {
                args: mock_args(),
                confirmations: 1,
            },
        )
        .await?;
    info!("Mocks deployed!");
    info!("{}", "-".repeat(54));

    Ok(Some(deployment))
}
