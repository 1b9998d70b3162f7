//! Source verification on Etherscan-compatible block explorers.

use std::time::Duration;

use ethers::{
    etherscan::{
        verify::{CodeFormat, VerifyContract},
        Client as Etherscan,
    },
    types::Chain,
};
use eyre::Result;
use tracing::{info, warn};

use crate::{
    compile::{CompiledContract, CompiledContracts},
    deployments::Deployment,
};

const STATUS_POLLS: usize = 10;
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    AlreadyVerified,
    Failed(String),
}

/// Submits the source of `deployment` for verification.
///
/// Never fails: an already verified contract is reported at info level and
/// any other problem is logged as a warning.
pub async fn verify(
    api_key: &str,
    chain_id: u64,
    contracts: &CompiledContracts,
    contract: &CompiledContract,
    deployment: &Deployment,
) -> VerificationOutcome {
    info!("Verifying contract...");
    let outcome = submit(api_key, chain_id, contracts, contract, deployment)
        .await
        .unwrap_or_else(|err| failure(err.to_string()));

    match &outcome {
        VerificationOutcome::Verified => info!("Contract verified at {:?}", deployment.address),
        VerificationOutcome::AlreadyVerified => info!("Already Verified!"),
        VerificationOutcome::Failed(reason) => warn!("Verification failed: {reason}"),
    }
    outcome
}

async fn submit(
    api_key: &str,
    chain_id: u64,
    contracts: &CompiledContracts,
    contract: &CompiledContract,
    deployment: &Deployment,
) -> Result<VerificationOutcome> {
    let client = Etherscan::new(Chain::try_from(chain_id)?, api_key)?;

    let source = serde_json::to_string(&contracts.standard_json_input(contract)?)?;
    let (optimized, runs) = contracts.optimizer();
    let mut request = VerifyContract::new(
        deployment.address,
        contracts.qualified_name(contract),
        source,
        etherscan_compiler_version(&contract.compiler_version),
    )
    .code_format(CodeFormat::StandardJsonInput)
    .constructor_arguments(Some(hex::encode(&deployment.args)))
    .optimization(optimized);
    if let Some(runs) = runs {
        request = request.runs(runs as u32);
    }

    let response = client.submit_contract_verification(&request).await?;
    if response.status != "1" {
        return Ok(failure(response.result));
    }

    let guid = response.result;
    for _ in 0..STATUS_POLLS {
        tokio::time::sleep(STATUS_POLL_INTERVAL).await;
        let status = client.check_contract_verification_status(&guid).await?;
        if status.result.contains("Pending in queue") {
            continue;
        }
        if status.result.starts_with("Pass") {
            return Ok(VerificationOutcome::Verified);
        }
        return Ok(failure(status.result));
    }
    Ok(VerificationOutcome::Failed(format!(
        "verification {guid} still pending"
    )))
}

fn failure(reason: String) -> VerificationOutcome {
    if reason.to_lowercase().contains("already verified") {
        VerificationOutcome::AlreadyVerified
    } else {
        VerificationOutcome::Failed(reason)
    }
}

/// Formats a solc version the way Etherscan lists compilers,
/// e.g. `0.8.19+commit.7dd6d404.Linux.g++` becomes `v0.8.19+commit.7dd6d404`.
pub fn etherscan_compiler_version(version: &str) -> String {
    let version = version.trim_start_matches('v');
    let (release, build) = match version.split_once('+') {
        Some((release, build)) => (release, Some(build)),
        None => (version, None),
    };
    let commit = build.and_then(|build| {
        let mut parts = build.split('.');
        match (parts.next(), parts.next()) {
            (Some("commit"), Some(hash)) => Some(hash),
            _ => None,
        }
    });
    match commit {
        Some(hash) => format!("v{release}+commit.{hash}"),
        None => format!("v{release}"),
    }
}
