//! Static per-chain configuration for the FundMe deployment.

use ethers::types::Address;
use eyre::{eyre, Result};

/// Known ETH/USD price feed for a public chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    pub name: &'static str,
    pub eth_usd_price_feed: &'static str,
}

impl ChainConfig {
    pub fn price_feed_address(&self) -> Result<Address> {
        Ok(self.eth_usd_price_feed.parse::<Address>()?)
    }
}

// Chain id => price feed
const NETWORK_CONFIG: &[(u64, ChainConfig)] = &[
    (
        5,
        ChainConfig {
            name: "goerli",
            eth_usd_price_feed: "0xD4a33860578De61DBAbDc8BFdb98FD742fA7028e",
        },
    ),
    (
        137,
        ChainConfig {
            name: "polygon",
            eth_usd_price_feed: "0xF9680D99D6C9589e2a93a78A04A279e509205945",
        },
    ),
];

/// Networks that are spun up locally and thrown away.
pub const DEVELOPMENT_CHAINS: &[&str] = &["hardhat", "localhost"];

/// Chain id of the local development node. Mocks are only deployed here.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Constructor arguments of the mock price feed: 2000 USD with 8 decimals.
pub const DECIMALS: u8 = 8;
pub const INITIAL_ANSWER: i64 = 200_000_000_000;

/// Looks up the price feed configuration for `chain_id`.
pub fn network_config(chain_id: u64) -> Result<&'static ChainConfig> {
    NETWORK_CONFIG
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, config)| config)
        .ok_or_else(|| eyre!("no price feed configured for chain id {chain_id}"))
}

pub fn is_development_chain(name: &str) -> bool {
    DEVELOPMENT_CHAINS.contains(&name)
}
