//! Account abstraction (ERC-4337) and L2 network primitive types
//!
//! This crate contains the entry point v0.7 user operation types, endpoint configuration, the
//! networks the scaffolder targets and helper functions shared by the other crates.

pub mod config;
pub mod constants;
pub mod network;
pub mod status;
mod user_operation;
mod utils;
mod wallet;

pub use config::{ClientConfig, ConfigurationError, EndpointSettings, Paymaster};
pub use network::Network;
pub use status::TransactionStatus;
pub use user_operation::{
    Call, GasPrice, GasPriceTiers, SponsorshipResult, UserOperationGasEstimation,
    UserOperationHash, UserOperationReceipt, UserOperationRequest, UserOperationSigned,
};
pub use utils::{get_address, pack_factory_data, pack_paymaster_data, pack_uint128};
pub use wallet::{sign_user_operation, Wallet};
