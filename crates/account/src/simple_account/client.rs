use super::contracts::{create_account_call, execute_calls, EntryPoint};
use crate::{
    backend::UserOperationClient,
    bundler::{BundlerApiClient, PaymasterApiClient, PimlicoApiClient},
};
use ethers::{
    providers::Middleware,
    signers::Signer,
    types::{Address, Bytes, U256},
};
use jsonrpsee::{
    core::ClientError,
    http_client::{HttpClient, HttpClientBuilder},
};
use l2_primitives::{
    constants::{entry_point, receipt, simple_account},
    sign_user_operation, Call, ClientConfig, GasPrice, Paymaster, UserOperationHash,
    UserOperationReceipt, UserOperationSigned,
};
use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tracing::{debug, trace};

/// Surfaces the message of a JSON-RPC error object as is (e.g. `AA21 didn't pay prefund`)
fn rpc_error(err: ClientError) -> eyre::Report {
    match err {
        ClientError::Call(err) => eyre::eyre!(err.message().to_string()),
        err => eyre::eyre!(err),
    }
}

/// User operation client for a SimpleAccount (entry point v0.7)
///
/// Gas fees come from the paymaster (pimlico `fast` tier) when one is configured, otherwise from
/// the execution client. Gas limits come from the paymaster sponsorship or the bundler estimation.
pub struct SimpleAccountClient<M, S> {
    account: Address,
    owner: S,
    factory: Address,
    salt: U256,
    entry_point: Address,
    chain_id: u64,
    eth_client: Arc<M>,
    bundler: HttpClient,
    paymaster: Option<HttpClient>,
    /// Set once bytecode is seen at `account`, after which the init code is never attached
    deployed: AtomicBool,
    poll_interval: Duration,
    receipt_timeout: Duration,
}

impl<M, S> SimpleAccountClient<M, S>
where
    M: Middleware + 'static,
    S: Signer + 'static,
{
    /// Create a new client
    ///
    /// # Arguments
    /// * `eth_client` - Execution client (account code, nonce, fees)
    /// * `config` - Bundler and paymaster endpoints
    /// * `owner` - Signer owning the account
    /// * `account` - Smart account address
    /// * `chain_id` - Chain id the user operations are signed for
    ///
    /// # Returns
    /// * `Self` - A new `SimpleAccountClient` instance
    pub fn new(
        eth_client: Arc<M>,
        config: &ClientConfig,
        owner: S,
        account: Address,
        chain_id: u64,
    ) -> eyre::Result<Self> {
        let bundler = HttpClientBuilder::default().build(config.bundler_url.as_str())?;
        let paymaster = match &config.paymaster {
            Paymaster::Sponsored(url) => Some(HttpClientBuilder::default().build(url.as_str())?),
            Paymaster::None => None,
        };

        Ok(Self {
            account,
            owner,
            factory: Address::from_str(simple_account::FACTORY)?,
            salt: U256::from(simple_account::SALT),
            entry_point: Address::from_str(entry_point::ADDRESS)?,
            chain_id,
            eth_client,
            bundler,
            paymaster,
            deployed: AtomicBool::new(false),
            poll_interval: Duration::from_millis(receipt::POLL_INTERVAL_MS),
            receipt_timeout: Duration::from_secs(receipt::TIMEOUT_SECS),
        })
    }

    pub fn factory(mut self, factory: Address, salt: U256) -> Self {
        self.factory = factory;
        self.salt = salt;
        self
    }

    pub fn receipt_polling(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.receipt_timeout = timeout;
        self
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn is_sponsored(&self) -> bool {
        self.paymaster.is_some()
    }

    /// Fails unless the bundler runs on `chain_id` and supports the v0.7 entry point
    pub async fn check_bundler(&self) -> eyre::Result<()> {
        let chain_id = BundlerApiClient::chain_id(&self.bundler).await.map_err(rpc_error)?;
        if chain_id.as_u64() != self.chain_id {
            return Err(eyre::eyre!(
                "Bundler runs on chain {chain_id}, execution client on chain {}",
                self.chain_id
            ));
        }

        let supported =
            BundlerApiClient::supported_entry_points(&self.bundler).await.map_err(rpc_error)?;
        if !supported.contains(&self.entry_point) {
            return Err(eyre::eyre!(
                "Bundler does not support entry point {:?} (v{}), supported: {supported:?}",
                self.entry_point,
                entry_point::VERSION
            ));
        }
        Ok(())
    }

    async fn is_deployed(&self) -> eyre::Result<bool> {
        if self.deployed.load(Ordering::Relaxed) {
            return Ok(true);
        }
        let code = self.eth_client.get_code(self.account, None).await?;
        if !code.is_empty() {
            self.deployed.store(true, Ordering::Relaxed);
        }
        Ok(!code.is_empty())
    }

    async fn gas_price(&self) -> eyre::Result<GasPrice> {
        match &self.paymaster {
            Some(paymaster) => {
                let tiers = PimlicoApiClient::get_user_operation_gas_price(paymaster)
                    .await
                    .map_err(rpc_error)?;
                Ok(tiers.fast)
            }
            None => {
                let (max_fee_per_gas, max_priority_fee_per_gas) =
                    self.eth_client.estimate_eip1559_fees(None).await?;
                Ok(GasPrice { max_fee_per_gas, max_priority_fee_per_gas })
            }
        }
    }

    /// Unsigned user operation with fees and gas limits filled in
    async fn build_user_operation(&self, calls: Vec<Call>) -> eyre::Result<UserOperationSigned> {
        let nonce = EntryPoint::new(self.entry_point, self.eth_client.clone())
            .get_nonce(self.account, U256::zero())
            .call()
            .await?;

        let mut uo = UserOperationSigned::default()
            .sender(self.account)
            .nonce(nonce)
            .call_data(execute_calls(calls))
            .signature(Bytes::from_str(simple_account::DUMMY_SIGNATURE)?);

        if !self.is_deployed().await? {
            debug!("Smart account {:?} not deployed yet, attaching init code", self.account);
            uo = uo.factory(self.factory, create_account_call(self.owner.address(), self.salt));
        }

        let uo = uo.gas_price(&self.gas_price().await?);

        let uo = match &self.paymaster {
            Some(paymaster) => {
                let sponsorship = PaymasterApiClient::sponsor_user_operation(
                    paymaster,
                    uo.clone(),
                    self.entry_point,
                )
                .await
                .map_err(rpc_error)?;
                trace!("Paymaster sponsorship: {sponsorship:?}");
                uo.sponsorship(&sponsorship)
            }
            None => {
                let estimation = BundlerApiClient::estimate_user_operation_gas(
                    &self.bundler,
                    uo.clone(),
                    self.entry_point,
                )
                .await
                .map_err(rpc_error)?;
                trace!("Gas estimation: {estimation:?}");
                uo.gas_estimation(&estimation)
            }
        };

        Ok(uo)
    }

    async fn poll_receipt(&self, hash: UserOperationHash) -> eyre::Result<UserOperationReceipt> {
        loop {
            let receipt = BundlerApiClient::get_user_operation_receipt(&self.bundler, hash)
                .await
                .map_err(rpc_error)?;
            if let Some(receipt) = receipt {
                return Ok(receipt);
            }
            trace!("No receipt for user operation {hash} yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait::async_trait]
impl<M, S> UserOperationClient for SimpleAccountClient<M, S>
where
    M: Middleware + 'static,
    S: Signer + 'static,
{
    async fn send_user_operation(&self, calls: Vec<Call>) -> eyre::Result<UserOperationHash> {
        let uo = self.build_user_operation(calls).await?;
        let uo = sign_user_operation(&self.owner, &uo, &self.entry_point, self.chain_id).await?;
        trace!("Sending user operation {uo:?}");

        let hash = BundlerApiClient::send_user_operation(&self.bundler, uo, self.entry_point)
            .await
            .map_err(rpc_error)?;
        Ok(hash)
    }

    async fn wait_for_user_operation_receipt(
        &self,
        hash: UserOperationHash,
    ) -> eyre::Result<UserOperationReceipt> {
        let receipt = tokio::time::timeout(self.receipt_timeout, self.poll_receipt(hash))
            .await
            .map_err(|_| {
                eyre::eyre!(
                    "Timed out waiting for the receipt of user operation {hash} after {}s",
                    self.receipt_timeout.as_secs()
                )
            })??;

        self.deployed.store(true, Ordering::Relaxed);
        Ok(receipt)
    }
}

impl<M, S: Signer> fmt::Debug for SimpleAccountClient<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleAccountClient")
            .field("account", &self.account)
            .field("owner", &self.owner.address())
            .field("entry_point", &self.entry_point)
            .field("chain_id", &self.chain_id)
            .field("sponsored", &self.paymaster.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;

    #[test]
    fn call_error_message_is_kept() {
        let err = ClientError::Call(ErrorObjectOwned::owned(
            -32500,
            "AA21 didn't pay prefund",
            None::<()>,
        ));
        assert_eq!(rpc_error(err).to_string(), "AA21 didn't pay prefund");
    }

    #[test]
    fn other_errors_are_wrapped() {
        assert_eq!(
            rpc_error(ClientError::RequestTimeout).to_string(),
            ClientError::RequestTimeout.to_string()
        );
    }
}
