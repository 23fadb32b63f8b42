//! What the caller asks the smart account to do

use crate::utils::as_checksum_addr;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Request for a single call executed by the smart account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationRequest {
    /// Address that is called
    #[serde(serialize_with = "as_checksum_addr")]
    pub target: Address,
    /// Value in wei
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
}

impl UserOperationRequest {
    /// Call to `target` with no value and empty call data
    pub fn new(target: Address) -> Self {
        Self { target, value: U256::zero(), data: Bytes::default() }
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn data(mut self, data: Bytes) -> Self {
        self.data = data;
        self
    }
}

/// One entry of the batch executed by the smart account
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl From<UserOperationRequest> for Call {
    fn from(request: UserOperationRequest) -> Self {
        Self { to: request.target, value: request.value, data: request.data }
    }
}
