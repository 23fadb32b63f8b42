//! SimpleAccount (entry point v0.7) backed by a JSON-RPC execution client and an ERC-4337 bundler
mod client;
pub mod contracts;

pub use client::SimpleAccountClient;

use crate::backend::AccountBackend;
use contracts::SimpleAccountFactory;
use ethers::{
    providers::{Http, Middleware, Provider},
    signers::Signer,
    types::{Address, Bytes, U256},
};
use l2_primitives::{
    constants::{receipt, simple_account},
    ClientConfig,
};
use std::{marker::PhantomData, str::FromStr, sync::Arc, time::Duration};
use tracing::debug;

/// [AccountBackend](AccountBackend) deriving SimpleAccounts through the factory over HTTP
pub struct EthersBackend<S> {
    factory: Address,
    salt: U256,
    poll_interval: Duration,
    receipt_timeout: Duration,
    _signer: PhantomData<fn() -> S>,
}

impl<S> EthersBackend<S> {
    /// Backend using the canonical SimpleAccountFactory with salt 0
    pub fn new() -> eyre::Result<Self> {
        Ok(Self {
            factory: Address::from_str(simple_account::FACTORY)?,
            salt: U256::from(simple_account::SALT),
            poll_interval: Duration::from_millis(receipt::POLL_INTERVAL_MS),
            receipt_timeout: Duration::from_secs(receipt::TIMEOUT_SECS),
            _signer: PhantomData,
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

    fn provider(config: &ClientConfig) -> eyre::Result<Arc<Provider<Http>>> {
        Ok(Arc::new(Provider::<Http>::try_from(config.rpc_url.as_str())?))
    }
}

#[async_trait::async_trait]
impl<S> AccountBackend for EthersBackend<S>
where
    S: Signer + 'static,
{
    type Signer = S;
    type Client = SimpleAccountClient<Provider<Http>, S>;

    async fn derive_account(&self, config: &ClientConfig, owner: &S) -> eyre::Result<Address> {
        let factory = SimpleAccountFactory::new(self.factory, Self::provider(config)?);
        let address = factory.get_address(owner.address(), self.salt).call().await?;
        Ok(address)
    }

    async fn create_client(
        &self,
        config: &ClientConfig,
        owner: S,
        account: Address,
    ) -> eyre::Result<Self::Client> {
        let provider = Self::provider(config)?;
        let chain_id = provider.get_chainid().await?.as_u64();
        debug!("Connected to chain {chain_id} through {}", config.rpc_url);

        let client = SimpleAccountClient::new(provider, config, owner, account, chain_id)?
            .factory(self.factory, self.salt)
            .receipt_polling(self.poll_interval, self.receipt_timeout);
        client.check_bundler().await?;

        Ok(client)
    }

    async fn get_code(&self, config: &ClientConfig, address: Address) -> eyre::Result<Bytes> {
        Ok(Self::provider(config)?.get_code(address, None).await?)
    }
}
