//! Runs against a freshly spawned local chain for every test.

mod common;

use ethers::{
    abi::Token,
    prelude::Middleware,
    types::{Address, Bytes, I256, U256},
    utils::parse_ether,
};
use eyre::Result;
use fund_me_deploy::{
    deploy::{mocks::mock_args, FUND_ME, MOCK_V3_AGGREGATOR},
    fund_me::{gas_cost, is_custom_error, revert_reason, FundMe, NOT_ENOUGH_ETH, NOT_OWNER_ERROR},
    helper_config::{DECIMALS, INITIAL_ANSWER},
    network::{Accounts, NetworkConfig, Rpc},
};

fn send_value() -> Result<U256> {
    Ok(parse_ether("1")?)
}

mod constructor {
    use super::*;

    #[tokio::test]
    async fn test_sets_the_aggregator_address() -> Result<()> {
        let env = common::fixture(&["all"]).await?;
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;
        let mock = env.deployments.get(MOCK_V3_AGGREGATOR)?;

        assert_eq!(fund_me.price_feed().await?, mock.address);
        assert_eq!(fund_me.owner().await?, env.deployer_address()?);
        Ok(())
    }

    #[tokio::test]
    async fn test_mock_is_deployed_with_fixed_price() -> Result<()> {
        let env = common::fixture(&["mocks"]).await?;
        let mock = env.deployments.get(MOCK_V3_AGGREGATOR)?;
        assert_eq!(mock.args, Bytes::from(ethers::abi::encode(&mock_args())));
        assert!(env.deployments.get(FUND_ME).is_err());

        let aggregator = env.get_contract(MOCK_V3_AGGREGATOR, env.deployer()?)?;
        let decimals = aggregator.method::<_, u8>("decimals", ())?.call().await?;
        let answer = aggregator
            .method::<_, I256>("latestAnswer", ())?
            .call()
            .await?;
        assert_eq!(decimals, DECIMALS);
        assert_eq!(answer, I256::from(INITIAL_ANSWER));
        Ok(())
    }

    #[tokio::test]
    async fn test_fund_me_records_the_price_feed_argument() -> Result<()> {
        let env = common::fixture(&[]).await?;
        let mock = env.deployments.get(MOCK_V3_AGGREGATOR)?;
        let fund_me = env.deployments.get(FUND_ME)?;
        assert_eq!(
            fund_me.args,
            Bytes::from(ethers::abi::encode(&[Token::Address(mock.address)]))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_fund_me_without_mock_fails_on_development_chain() -> Result<()> {
        let mut env = common::fixture(&["nothing"]).await?;

        let err = common::run_steps(&mut env, &["fundme"]).await.unwrap_err();
        assert!(
            err.to_string().contains("no deployment named MockV3Aggregator"),
            "got: {err}"
        );
        Ok(())
    }
}

mod public_network {
    use super::*;

    // A non-development network name on a spawned node
    fn network(name: &str, chain_id: u64) -> NetworkConfig {
        NetworkConfig {
            name: name.to_string(),
            chain_id,
            rpc: Rpc::Ganache,
            accounts: Accounts::Ganache,
            block_confirmations: None,
        }
    }

    #[tokio::test]
    async fn test_uses_the_configured_price_feed() -> Result<()> {
        let mut env = common::connect(network("goerli", 5)).await?;
        common::run_steps(&mut env, &[]).await?;

        assert!(env.deployments.get(MOCK_V3_AGGREGATOR).is_err());
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;
        assert_eq!(
            fund_me.price_feed().await?,
            "0xD4a33860578De61DBAbDc8BFdb98FD742fA7028e".parse::<Address>()?
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_chain_aborts_the_deployment() -> Result<()> {
        let mut env = common::connect(network("ganache", 1337)).await?;

        let err = common::run_steps(&mut env, &[]).await.unwrap_err();
        assert!(
            err.to_string().contains("no price feed configured for chain id 1337"),
            "got: {err}"
        );
        assert!(env.deployments.get(FUND_ME).is_err());
        Ok(())
    }
}

mod fund {
    use super::*;

    #[tokio::test]
    async fn test_fails_if_you_dont_send_enough_eth() -> Result<()> {
        let env = common::fixture(&["all"]).await?;
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;

        let err = fund_me.fund(U256::zero()).await.unwrap_err();
        assert_eq!(revert_reason(&err).as_deref(), Some(NOT_ENOUGH_ETH));

        // 0.02 ETH is 40 USD at the mocked price
        let err = fund_me.fund(parse_ether("0.02")?).await.unwrap_err();
        assert_eq!(revert_reason(&err).as_deref(), Some(NOT_ENOUGH_ETH));
        assert_eq!(fund_me.balance().await?, U256::zero());
        Ok(())
    }

    #[tokio::test]
    async fn test_updates_the_amount_funded_data_structure() -> Result<()> {
        let env = common::fixture(&["all"]).await?;
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;

        fund_me.fund(send_value()?).await?;
        let response = fund_me
            .address_to_amount_funded(env.deployer_address()?)
            .await?;
        assert_eq!(response, send_value()?);
        Ok(())
    }

    #[tokio::test]
    async fn test_adds_funder_to_array_of_funders() -> Result<()> {
        let env = common::fixture(&["all"]).await?;
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;

        fund_me.fund(send_value()?).await?;
        assert_eq!(fund_me.funders(0).await?, env.deployer_address()?);
        Ok(())
    }

    #[tokio::test]
    async fn test_minimum_is_fifty_usd() -> Result<()> {
        let env = common::fixture(&["all"]).await?;
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;
        assert_eq!(fund_me.minimum_usd().await?, parse_ether("50")?);

        // exactly 50 USD at 2000 USD/ETH
        fund_me.fund(parse_ether("0.025")?).await?;
        assert_eq!(fund_me.balance().await?, parse_ether("0.025")?);
        Ok(())
    }
}

mod withdraw {
    use super::*;

    async fn funded() -> Result<(fund_me_deploy::Environment, FundMe)> {
        let env = common::fixture(&["all"]).await?;
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;
        fund_me.fund(send_value()?).await?;
        Ok((env, fund_me))
    }

    #[tokio::test]
    async fn test_withdraw_eth_from_a_single_funder() -> Result<()> {
        let (env, fund_me) = funded().await?;
        let deployer = env.deployer_address()?;
        let provider = env.provider();

        // Arrange
        let starting_fund_me_balance = fund_me.balance().await?;
        let starting_deployer_balance = provider.get_balance(deployer, None).await?;

        // Act
        let receipt = fund_me.withdraw().await?;
        let gas_cost = gas_cost(&receipt)?;

        // Assert
        let ending_fund_me_balance = fund_me.balance().await?;
        let ending_deployer_balance = provider.get_balance(deployer, None).await?;
        assert_eq!(ending_fund_me_balance, U256::zero());
        assert_eq!(
            starting_fund_me_balance + starting_deployer_balance,
            ending_deployer_balance + gas_cost
        );
        assert_eq!(fund_me.address_to_amount_funded(deployer).await?, U256::zero());
        Ok(())
    }

    #[tokio::test]
    async fn test_allows_us_to_withdraw_with_multiple_funders() -> Result<()> {
        let (env, fund_me) = funded().await?;
        let deployer = env.deployer_address()?;
        let provider = env.provider();

        let mut funders = Vec::new();
        for index in 1..6 {
            let signer = env.signer(index)?;
            funders.push(signer.address());
            fund_me.connect(signer).fund(send_value()?).await?;
        }
        let starting_fund_me_balance = fund_me.balance().await?;
        assert_eq!(starting_fund_me_balance, send_value()? * U256::from(6u64));
        let starting_deployer_balance = provider.get_balance(deployer, None).await?;

        let receipt = fund_me.withdraw().await?;
        let gas_cost = gas_cost(&receipt)?;

        let ending_fund_me_balance = fund_me.balance().await?;
        let ending_deployer_balance = provider.get_balance(deployer, None).await?;
        assert_eq!(ending_fund_me_balance, U256::zero());
        assert_eq!(
            starting_fund_me_balance + starting_deployer_balance,
            ending_deployer_balance + gas_cost
        );

        // the funder list is reset
        assert!(fund_me.funders(0).await.is_err());

        for funder in funders {
            assert_eq!(fund_me.address_to_amount_funded(funder).await?, U256::zero());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_cheaper_withdraw_with_multiple_funders() -> Result<()> {
        let (env, fund_me) = funded().await?;
        for index in 1..6 {
            fund_me.connect(env.signer(index)?).fund(send_value()?).await?;
        }

        fund_me.cheaper_withdraw().await?;

        assert_eq!(fund_me.balance().await?, U256::zero());
        assert!(fund_me.funders(0).await.is_err());
        for index in 1..6 {
            let funder = env.signer(index)?.address();
            assert_eq!(fund_me.address_to_amount_funded(funder).await?, U256::zero());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_only_allows_the_owner_to_withdraw() -> Result<()> {
        let (env, fund_me) = funded().await?;
        let attacker = env.signer(1)?;
        let attacker_connected = fund_me.connect(attacker);
        let starting_fund_me_balance = fund_me.balance().await?;

        let err = attacker_connected.withdraw().await.unwrap_err();
        assert!(is_custom_error(&err, NOT_OWNER_ERROR), "got: {err:?}");

        assert_eq!(fund_me.balance().await?, starting_fund_me_balance);
        assert_eq!(
            fund_me.address_to_amount_funded(env.deployer_address()?).await?,
            send_value()?
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_fund_then_withdraw_round_trip() -> Result<()> {
        let env = common::fixture(&["all"]).await?;
        let fund_me = FundMe::deployed(&env, env.deployer()?)?;
        let account_a = env.signer(1)?;
        let funder = account_a.address();

        fund_me.connect(account_a).fund(send_value()?).await?;
        fund_me.withdraw().await?;

        assert_eq!(fund_me.balance().await?, U256::zero());
        assert_eq!(fund_me.address_to_amount_funded(funder).await?, U256::zero());
        assert!(fund_me.funders(0).await.is_err());
        Ok(())
    }
}
