//! Deployment steps, run in order and filtered by tag.

pub mod fund_me;
pub mod mocks;

use eyre::Result;
use tracing::info;

use crate::{compile::CompiledContracts, environment::Environment};

pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";
pub const FUND_ME: &str = "FundMe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Mocks,
    FundMe,
}

/// Every step in execution order.
pub const STEPS: [Step; 2] = [Step::Mocks, Step::FundMe];

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Mocks => "00-deploy-mocks",
            Step::FundMe => "01-deploy-fund-me",
        }
    }

    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Step::Mocks => &["all", "mocks"],
            Step::FundMe => &["all", "fundme"],
        }
    }

    /// No tags selects every step.
    pub fn matches(&self, tags: &[String]) -> bool {
        tags.is_empty() || tags.iter().any(|tag| self.tags().contains(&tag.as_str()))
    }

    async fn run(self, env: &mut Environment, contracts: &CompiledContracts) -> Result<()> {
        match self {
            Step::Mocks => {
                mocks::deploy_mocks(env, contracts).await?;
            }
            Step::FundMe => {
                fund_me::deploy_fund_me(env, contracts).await?;
            }
        }
        Ok(())
    }
}

pub fn selected(tags: &[String]) -> Vec<Step> {
    STEPS.into_iter().filter(|step| step.matches(tags)).collect()
}

/// Runs the steps selected by `tags` against `env`.
pub async fn run(env: &mut Environment, contracts: &CompiledContracts, tags: &[String]) -> Result<()> {
    for step in selected(tags) {
        info!("running {}", step.name());
        step.run(env, contracts).await?;
    }
    Ok(())
}
