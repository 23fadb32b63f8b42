//! JSON-RPC clients for the ERC-4337 bundler and the paymaster
use ethers::types::{Address, U64};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use l2_primitives::{
    GasPriceTiers, SponsorshipResult, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt, UserOperationSigned,
};

/// Bundler (eth namespace)
#[rpc(client, namespace = "eth")]
pub trait BundlerApi {
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;

    #[method(name = "supportedEntryPoints")]
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>>;

    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation>;

    /// `None` until the operation is mined
    #[method(name = "getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>>;
}

/// Paymaster sponsorship (pm namespace)
#[rpc(client, namespace = "pm")]
pub trait PaymasterApi {
    #[method(name = "sponsorUserOperation")]
    async fn sponsor_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<SponsorshipResult>;
}

/// Pimlico extensions served by the paymaster endpoint
#[rpc(client, namespace = "pimlico")]
pub trait PimlicoApi {
    #[method(name = "getUserOperationGasPrice")]
    async fn get_user_operation_gas_price(&self) -> RpcResult<GasPriceTiers>;
}
