#![allow(dead_code)]

use ethers::{
    types::{Address, Bytes, TransactionReceipt, H256, U256},
    utils::keccak256,
};
use l2_account::{AccountBackend, UserOperationClient};
use l2_primitives::{
    Call, ClientConfig, EndpointSettings, UserOperationHash, UserOperationReceipt,
};
use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::Notify;

pub const BUNDLER_URL: &str = "https://bundler.example.com/rpc";
pub const PAYMASTER_URL: &str = "https://paymaster.example.com/rpc";

pub fn settings() -> EndpointSettings {
    EndpointSettings {
        rpc_url: None,
        bundler_url: Some(BUNDLER_URL.into()),
        paymaster_url: Some(PAYMASTER_URL.into()),
    }
}

/// Counterfactual address the mock derives for `owner`
pub fn account_of(owner: Address) -> Address {
    Address::from_slice(&keccak256(owner.as_bytes())[12..])
}

pub fn receipt(hash: UserOperationHash, sender: Address, success: bool) -> UserOperationReceipt {
    UserOperationReceipt {
        user_operation_hash: hash,
        entry_point: None,
        sender,
        nonce: U256::zero(),
        paymaster: None,
        actual_gas_cost: 1000.into(),
        actual_gas_used: 100.into(),
        success,
        reason: if success { String::new() } else { "AA23 reverted".into() },
        logs: vec![],
        tx_receipt: TransactionReceipt {
            transaction_hash: H256::repeat_byte(0xee),
            ..Default::default()
        },
    }
}

/// What the user operation clients created by [MockBackend] do
#[derive(Default)]
pub struct ClientBehaviour {
    pub sent: Mutex<Vec<Vec<Call>>>,
    pub send_error: Mutex<Option<String>>,
    pub receipt_error: Mutex<Option<String>>,
    pub reverts: Mutex<bool>,
    pub receipts_waited: AtomicUsize,
}

pub struct MockClient {
    account: Address,
    behaviour: Arc<ClientBehaviour>,
}

#[async_trait::async_trait]
impl UserOperationClient for MockClient {
    async fn send_user_operation(&self, calls: Vec<Call>) -> eyre::Result<UserOperationHash> {
        if let Some(err) = self.behaviour.send_error.lock().clone() {
            return Err(eyre::eyre!(err));
        }
        let mut sent = self.behaviour.sent.lock();
        sent.push(calls);
        Ok(UserOperationHash::repeat_byte(sent.len() as u8))
    }

    async fn wait_for_user_operation_receipt(
        &self,
        hash: UserOperationHash,
    ) -> eyre::Result<UserOperationReceipt> {
        self.behaviour.receipts_waited.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.behaviour.receipt_error.lock().clone() {
            return Err(eyre::eyre!(err));
        }
        let success = !*self.behaviour.reverts.lock();
        Ok(receipt(hash, self.account, success))
    }
}

/// Backend without network access; owners are plain addresses
#[derive(Default)]
pub struct MockBackend {
    pub code: Mutex<Bytes>,
    pub derive_error: Mutex<Option<String>>,
    pub code_error: Mutex<Option<String>>,
    /// When set, `derive_account` blocks until notified
    pub gate: Mutex<Option<Arc<Notify>>>,
    pub derive_calls: AtomicUsize,
    pub client_calls: AtomicUsize,
    pub code_calls: AtomicUsize,
    pub behaviour: Arc<ClientBehaviour>,
}

impl MockBackend {
    pub fn network_calls(&self) -> usize {
        self.derive_calls.load(Ordering::SeqCst) +
            self.client_calls.load(Ordering::SeqCst) +
            self.code_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AccountBackend for MockBackend {
    type Signer = Address;
    type Client = MockClient;

    async fn derive_account(
        &self,
        _config: &ClientConfig,
        owner: &Address,
    ) -> eyre::Result<Address> {
        self.derive_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(err) = self.derive_error.lock().clone() {
            return Err(eyre::eyre!(err));
        }
        Ok(account_of(*owner))
    }

    async fn create_client(
        &self,
        _config: &ClientConfig,
        _owner: Address,
        account: Address,
    ) -> eyre::Result<MockClient> {
        self.client_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MockClient { account, behaviour: self.behaviour.clone() })
    }

    async fn get_code(&self, _config: &ClientConfig, _address: Address) -> eyre::Result<Bytes> {
        self.code_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.code_error.lock().clone() {
            return Err(eyre::eyre!(err));
        }
        Ok(self.code.lock().clone())
    }
}
