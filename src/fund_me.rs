//! Typed handle over a deployed FundMe contract.

use std::sync::Arc;

use ethers::{
    contract::{ContractCall, ContractError},
    prelude::Middleware,
    types::{Address, Bytes, TransactionReceipt, U256},
    utils::id,
};
use eyre::{eyre, ContextCompat, Result};

use crate::{
    deploy::FUND_ME,
    environment::{Client, Environment, SignerDeployedContract},
};

/// Custom error raised when anyone but the owner withdraws.
pub const NOT_OWNER_ERROR: &str = "FundMe__NotOwner()";

/// Revert reason of a fund call below the USD minimum.
pub const NOT_ENOUGH_ETH: &str = "You need to spend more ETH!";

#[derive(Debug, Clone)]
pub struct FundMe {
    contract: SignerDeployedContract,
}

impl FundMe {
    pub fn new(contract: SignerDeployedContract) -> Self {
        Self { contract }
    }

    /// The FundMe deployment registered in `env`.
    pub fn deployed(env: &Environment, signer: Arc<Client>) -> Result<Self> {
        Ok(Self::new(env.get_contract(FUND_ME, signer)?))
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Same contract, transactions signed by `signer`.
    pub fn connect(&self, signer: Arc<Client>) -> Self {
        Self::new(self.contract.connect(signer))
    }

    pub async fn fund(&self, value: U256) -> Result<TransactionReceipt> {
        let call = self.contract.method::<_, ()>("fund", ())?.value(value);
        send(call).await
    }

    pub async fn withdraw(&self) -> Result<TransactionReceipt> {
        send(self.contract.method::<_, ()>("withdraw", ())?).await
    }

    pub async fn cheaper_withdraw(&self) -> Result<TransactionReceipt> {
        send(self.contract.method::<_, ()>("cheaperWithdraw", ())?).await
    }

    pub async fn price_feed(&self) -> Result<Address> {
        Ok(self
            .contract
            .method::<_, Address>("s_priceFeed", ())?
            .call()
            .await?)
    }

    pub async fn address_to_amount_funded(&self, funder: Address) -> Result<U256> {
        Ok(self
            .contract
            .method::<_, U256>("s_addressToAmountFunded", funder)?
            .call()
            .await?)
    }

    /// Funder at `index`; fails past the end of the list.
    pub async fn funders(&self, index: u64) -> Result<Address> {
        Ok(self
            .contract
            .method::<_, Address>("s_funders", U256::from(index))?
            .call()
            .await?)
    }

    pub async fn owner(&self) -> Result<Address> {
        Ok(self
            .contract
            .method::<_, Address>("getOwner", ())?
            .call()
            .await?)
    }

    pub async fn minimum_usd(&self) -> Result<U256> {
        Ok(self
            .contract
            .method::<_, U256>("MINIMUM_USD", ())?
            .call()
            .await?)
    }

    /// Native currency held by the contract.
    pub async fn balance(&self) -> Result<U256> {
        Ok(self
            .contract
            .client()
            .get_balance(self.address(), None)
            .await?)
    }
}

async fn send(call: ContractCall<Client, ()>) -> Result<TransactionReceipt> {
    let call = call.legacy();
    let receipt = call
        .send()
        .await?
        .confirmations(1)
        .await?
        .context("Missing receipt")?;
    if receipt.status == Some(0u64.into()) {
        return Err(eyre!(
            "transaction {:?} reverted",
            receipt.transaction_hash
        ));
    }
    Ok(receipt)
}

/// Gas paid by the sender of `receipt`.
pub fn gas_cost(receipt: &TransactionReceipt) -> Result<U256> {
    let gas_used = receipt.gas_used.context("receipt without gas used")?;
    let gas_price = receipt
        .effective_gas_price
        .context("receipt without effective gas price")?;
    Ok(gas_used * gas_price)
}

/// Raw revert data carried by a failed contract call.
pub fn revert_data(err: &eyre::Report) -> Option<&Bytes> {
    err.downcast_ref::<ContractError<Client>>()?.as_revert()
}

/// Decoded `Error(string)` reason of a failed contract call.
pub fn revert_reason(err: &eyre::Report) -> Option<String> {
    err.downcast_ref::<ContractError<Client>>()?
        .decode_revert::<String>()
}

/// Whether the call reverted with the custom error `signature`,
/// e.g. `FundMe__NotOwner()`.
pub fn is_custom_error(err: &eyre::Report, signature: &str) -> bool {
    revert_data(err).is_some_and(|data| data.len() >= 4 && data[..4] == id(signature))
}
