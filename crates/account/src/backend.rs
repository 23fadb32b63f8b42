use ethers::types::{Address, Bytes};
use l2_primitives::{Call, ClientConfig, UserOperationHash, UserOperationReceipt};

/// A client able to submit user operations for one smart account and track them
#[async_trait::async_trait]
pub trait UserOperationClient: Send + Sync + 'static {
    /// Signs, estimates and submits a user operation executing `calls`.
    ///
    /// # Returns
    /// * `UserOperationHash` - The hash the bundler accepted the operation under
    async fn send_user_operation(&self, calls: Vec<Call>) -> eyre::Result<UserOperationHash>;

    /// Waits until the operation is mined (or the client gives up)
    async fn wait_for_user_operation_receipt(
        &self,
        hash: UserOperationHash,
    ) -> eyre::Result<UserOperationReceipt>;
}

/// Network collaborators needed to bring a smart account session up
#[async_trait::async_trait]
pub trait AccountBackend: Send + Sync + 'static {
    /// Owner capability handed over by the wallet session
    type Signer: Send + Sync + 'static;
    type Client: UserOperationClient;

    /// Derives the (counterfactual) smart account address of `owner`
    async fn derive_account(&self, config: &ClientConfig, owner: &Self::Signer)
        -> eyre::Result<Address>;

    /// Builds the user operation client (and the paymaster client, if configured)
    async fn create_client(
        &self,
        config: &ClientConfig,
        owner: Self::Signer,
        account: Address,
    ) -> eyre::Result<Self::Client>;

    /// Bytecode at `address`
    async fn get_code(&self, config: &ClientConfig, address: Address) -> eyre::Result<Bytes>;
}
