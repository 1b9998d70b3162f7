//! Networks the deploy scripts can target.

use std::env;

use eyre::{eyre, Result, WrapErr};

use crate::helper_config::{is_development_chain, LOCAL_CHAIN_ID};

/// Mnemonic of the spawned Ganache node.
pub const GANACHE_MNEMONIC: &str =
    "gas monster ski craft below illegal discover limit dog bundle bus artefact";

/// Default mnemonic of a local development node listening on 8545.
pub const LOCALHOST_MNEMONIC: &str = "test test test test test test test test test test test junk";

pub const LOCALHOST_URL: &str = "http://127.0.0.1:8545";

/// Where the JSON-RPC endpoint comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rpc {
    /// A Ganache instance spawned for the lifetime of the process.
    Ganache,
    Url(String),
}

/// Signing accounts available on a network.
#[derive(Clone, PartialEq, Eq)]
pub enum Accounts {
    /// Keys generated by the spawned Ganache node.
    Ganache,
    Mnemonic { phrase: String, count: u32 },
    PrivateKeys(Vec<String>),
}

// Keep private keys out of logs.
impl std::fmt::Debug for Accounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accounts::Ganache => write!(f, "Ganache"),
            Accounts::Mnemonic { count, .. } => write!(f, "Mnemonic({count} accounts)"),
            Accounts::PrivateKeys(keys) => write!(f, "PrivateKeys({} keys)", keys.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc: Rpc,
    pub accounts: Accounts,
    pub block_confirmations: Option<usize>,
}

impl NetworkConfig {
    /// Resolves one of the built-in networks. Public networks read their
    /// endpoint and key from the environment.
    pub fn named(name: &str) -> Result<Self> {
        let config = match name {
            "hardhat" => NetworkConfig {
                name: name.to_string(),
                chain_id: LOCAL_CHAIN_ID,
                rpc: Rpc::Ganache,
                accounts: Accounts::Ganache,
                block_confirmations: None,
            },
            "localhost" => NetworkConfig {
                name: name.to_string(),
                chain_id: LOCAL_CHAIN_ID,
                rpc: Rpc::Url(LOCALHOST_URL.to_string()),
                accounts: Accounts::Mnemonic {
                    phrase: LOCALHOST_MNEMONIC.to_string(),
                    count: 10,
                },
                block_confirmations: None,
            },
            "goerli" => NetworkConfig {
                name: name.to_string(),
                chain_id: 5,
                rpc: Rpc::Url(required_env("GOERLI_RPC_URL")?),
                accounts: Accounts::PrivateKeys(vec![required_env("PRIVATE_KEY")?]),
                block_confirmations: Some(6),
            },
            "polygon" => NetworkConfig {
                name: name.to_string(),
                chain_id: 137,
                rpc: Rpc::Url(required_env("POLYGON_RPC_URL")?),
                accounts: Accounts::PrivateKeys(vec![required_env("PRIVATE_KEY")?]),
                block_confirmations: Some(6),
            },
            other => return Err(eyre!("unknown network {other:?}")),
        };
        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        is_development_chain(&self.name)
    }

    /// Blocks to wait for after each deployment.
    pub fn confirmations(&self) -> usize {
        self.block_confirmations.unwrap_or(1)
    }

    /// Deployment records only outlive the process on networks that do.
    pub fn is_persistent(&self) -> bool {
        self.rpc != Rpc::Ganache
    }
}

fn required_env(key: &str) -> Result<String> {
    env::var(key).wrap_err_with(|| format!("environment variable {key} is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardhat_network_is_ephemeral_development_chain() -> Result<()> {
        let network = NetworkConfig::named("hardhat")?;
        assert_eq!(network.chain_id, LOCAL_CHAIN_ID);
        assert_eq!(network.rpc, Rpc::Ganache);
        assert!(network.is_development());
        assert!(!network.is_persistent());
        assert_eq!(network.confirmations(), 1);
        Ok(())
    }

    #[test]
    fn test_localhost_network() -> Result<()> {
        let network = NetworkConfig::named("localhost")?;
        assert_eq!(network.rpc, Rpc::Url(LOCALHOST_URL.to_string()));
        assert!(network.is_development());
        assert!(network.is_persistent());
        Ok(())
    }

    #[test]
    fn test_confirmations_fall_back_to_one() {
        let mut network = NetworkConfig {
            name: "goerli".to_string(),
            chain_id: 5,
            rpc: Rpc::Url("http://goerli.invalid".to_string()),
            accounts: Accounts::PrivateKeys(vec![]),
            block_confirmations: Some(6),
        };
        assert!(!network.is_development());
        assert_eq!(network.confirmations(), 6);
        network.block_confirmations = None;
        assert_eq!(network.confirmations(), 1);
    }

    #[test]
    fn test_unknown_network() {
        let err = NetworkConfig::named("mainnet").unwrap_err();
        assert!(err.to_string().contains("mainnet"));
    }

    #[test]
    fn test_private_keys_are_not_printed() {
        let accounts = Accounts::PrivateKeys(vec!["0xdeadbeef".to_string()]);
        assert_eq!(format!("{accounts:?}"), "PrivateKeys(1 keys)");
    }
}
