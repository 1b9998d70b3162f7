//! Deployment and test harness for the FundMe contract.
//!
//! The `deploy` binary compiles `contracts/`, provisions a price feed (a mock
//! on the local chain, a known feed elsewhere) and deploys FundMe on top of it.
//! The `transact` binary funds and withdraws from an existing deployment.

pub mod compile;
pub mod deploy;
pub mod deployments;
pub mod environment;
pub mod fund_me;
pub mod helper_config;
pub mod network;
pub mod verify;

pub use environment::{Client, Environment, Settings, SignerDeployedContract};

/// Installs the fmt subscriber used by the binaries, `info` unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
