//! Smart account (ERC-4337) lifecycle management
//!
//! Takes a connected wallet (the owner signer) to a ready-to-transact smart account session and
//! mediates the submission and tracking of user operations. Network access goes through the
//! [AccountBackend](AccountBackend) trait; [EthersBackend](EthersBackend) is the implementation
//! backed by a JSON-RPC execution client, an ERC-4337 bundler and an optional paymaster.

mod backend;
pub mod bundler;
mod error;
mod manager;
pub mod simple_account;
mod tracker;

pub use backend::{AccountBackend, UserOperationClient};
pub use error::SmartAccountError;
pub use manager::{
    SessionState, SessionView, SmartAccountDescriptor, SmartAccountManager, UserOperationHandle,
};
pub use simple_account::{EthersBackend, SimpleAccountClient};
pub use tracker::TransactionTracker;
