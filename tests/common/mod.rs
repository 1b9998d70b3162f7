use eyre::Result;
use fund_me_deploy::{
    compile::compile, deploy, network::NetworkConfig, Environment, Settings,
};

/// Connects to `network` with verification disabled.
pub async fn connect(network: NetworkConfig) -> Result<Environment> {
    let settings = Settings {
        etherscan_api_key: None,
        ..Settings::from_env()
    };
    Environment::connect(network, settings).await
}

/// Runs the steps matching `tags` against `env`.
pub async fn run_steps(env: &mut Environment, tags: &[&str]) -> Result<()> {
    let contracts = compile(&env.settings.contracts_root).await?;
    let tags = tags.iter().map(|tag| tag.to_string()).collect::<Vec<_>>();
    deploy::run(env, &contracts, &tags).await
}

/// Fresh local chain with the steps matching `tags` already deployed.
pub async fn fixture(tags: &[&str]) -> Result<Environment> {
    let mut env = connect(NetworkConfig::named("hardhat")?).await?;
    run_steps(&mut env, tags).await?;
    Ok(env)
}
