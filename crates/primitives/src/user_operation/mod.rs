//! Basic transaction type for account abstraction (ERC-4337), entry point v0.7

mod hash;
mod request;

use crate::utils::{
    as_checksum_addr, as_checksum_addr_opt, pack_factory_data, pack_paymaster_data, pack_uint128,
};
use ethers::{
    abi::{encode, Token},
    types::{Address, Bytes, Log, TransactionReceipt, H256, U256},
    utils::keccak256,
};
pub use hash::UserOperationHash;
pub use request::{Call, UserOperationRequest};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// User operation in the unpacked form used by the bundler JSON-RPC API (entry point v0.7)
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationSigned {
    /// Sender of the user operation
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,

    /// Nonce (anti replay protection)
    pub nonce: U256,

    /// Factory deploying the account (only while the account is not yet deployed)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "as_checksum_addr_opt"
    )]
    pub factory: Option<Address>,

    /// Call data passed to the factory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_data: Option<Bytes>,

    /// The data that is passed to the sender during the main execution call
    pub call_data: Bytes,

    /// The amount of gas to allocate for the main execution call
    pub call_gas_limit: U256,

    /// The amount of gas to allocate for the verification step
    pub verification_gas_limit: U256,

    /// The amount of gas to pay bundler to compensate for the pre-verification execution and
    /// calldata
    pub pre_verification_gas: U256,

    /// Maximum fee per gas (similar to EIP-1559)
    pub max_fee_per_gas: U256,

    /// Maximum priority fee per gas (similar to EIP-1559)
    pub max_priority_fee_per_gas: U256,

    /// Paymaster sponsoring the user operation
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "as_checksum_addr_opt"
    )]
    pub paymaster: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_verification_gas_limit: Option<U256>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_post_op_gas_limit: Option<U256>,

    /// Extra data sent to the paymaster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_data: Option<Bytes>,

    /// Data passed to the account along with the nonce during the verification step
    pub signature: Bytes,
}

impl UserOperationSigned {
    /// `factory || factoryData` as stored in the packed user operation
    pub fn init_code(&self) -> Bytes {
        match self.factory {
            Some(factory) => pack_factory_data(factory, &self.factory_data.clone().unwrap_or_default())
                .into(),
            None => Bytes::default(),
        }
    }

    /// `paymaster || verification gas || post op gas || paymasterData` as stored in the packed
    /// user operation
    pub fn paymaster_and_data(&self) -> Bytes {
        match self.paymaster {
            Some(paymaster) => pack_paymaster_data(
                paymaster,
                self.paymaster_verification_gas_limit.unwrap_or_default(),
                self.paymaster_post_op_gas_limit.unwrap_or_default(),
                &self.paymaster_data.clone().unwrap_or_default(),
            )
            .into(),
            None => Bytes::default(),
        }
    }

    /// `verificationGasLimit || callGasLimit`
    pub fn account_gas_limits(&self) -> [u8; 32] {
        pack_uint128(self.verification_gas_limit, self.call_gas_limit)
    }

    /// `maxPriorityFeePerGas || maxFeePerGas`
    pub fn gas_fees(&self) -> [u8; 32] {
        pack_uint128(self.max_priority_fee_per_gas, self.max_fee_per_gas)
    }

    /// Packs the user operation without signature to bytes (used for calculating the hash)
    pub fn pack_without_signature(&self) -> Bytes {
        encode(&[
            Token::Address(self.sender),
            Token::Uint(self.nonce),
            Token::FixedBytes(keccak256(self.init_code().deref()).to_vec()),
            Token::FixedBytes(keccak256(self.call_data.deref()).to_vec()),
            Token::FixedBytes(self.account_gas_limits().to_vec()),
            Token::Uint(self.pre_verification_gas),
            Token::FixedBytes(self.gas_fees().to_vec()),
            Token::FixedBytes(keccak256(self.paymaster_and_data().deref()).to_vec()),
        ])
        .into()
    }

    /// Calculates the hash of the user operation (same as `EntryPoint.getUserOpHash`)
    pub fn hash(&self, entry_point: &Address, chain_id: u64) -> UserOperationHash {
        H256::from(keccak256(encode(&[
            Token::FixedBytes(keccak256(self.pack_without_signature().deref()).to_vec()),
            Token::Address(*entry_point),
            Token::Uint(U256::from(chain_id)),
        ])))
        .into()
    }

    // Builder pattern helpers

    /// Sets the sender of the user operation
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the nonce of the user operation
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the factory and the factory call data of the user operation
    pub fn factory(mut self, factory: Address, factory_data: Bytes) -> Self {
        self.factory = Some(factory);
        self.factory_data = Some(factory_data);
        self
    }

    /// Sets the call data of the user operation
    pub fn call_data(mut self, call_data: Bytes) -> Self {
        self.call_data = call_data;
        self
    }

    /// Sets the call gas limit of the user operation
    pub fn call_gas_limit(mut self, call_gas_limit: U256) -> Self {
        self.call_gas_limit = call_gas_limit;
        self
    }

    /// Sets the verification gas limit of the user operation
    pub fn verification_gas_limit(mut self, verification_gas_limit: U256) -> Self {
        self.verification_gas_limit = verification_gas_limit;
        self
    }

    /// Sets the pre-verification gas of the user operation
    pub fn pre_verification_gas(mut self, pre_verification_gas: U256) -> Self {
        self.pre_verification_gas = pre_verification_gas;
        self
    }

    /// Sets the max fee per gas of the user operation
    pub fn max_fee_per_gas(mut self, max_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self
    }

    /// Sets the max priority fee per gas of the user operation
    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    /// Sets the signature of the user operation
    pub fn signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }

    /// Applies fees
    pub fn gas_price(self, gas_price: &GasPrice) -> Self {
        self.max_fee_per_gas(gas_price.max_fee_per_gas)
            .max_priority_fee_per_gas(gas_price.max_priority_fee_per_gas)
    }

    /// Applies gas limits returned by `eth_estimateUserOperationGas`
    pub fn gas_estimation(mut self, estimation: &UserOperationGasEstimation) -> Self {
        self.pre_verification_gas = estimation.pre_verification_gas;
        self.verification_gas_limit = estimation.verification_gas_limit;
        self.call_gas_limit = estimation.call_gas_limit;
        if self.paymaster.is_some() {
            if let Some(gas) = estimation.paymaster_verification_gas_limit {
                self.paymaster_verification_gas_limit = Some(gas);
            }
        }
        self
    }

    /// Applies paymaster fields and gas limits returned by `pm_sponsorUserOperation`
    pub fn sponsorship(mut self, sponsorship: &SponsorshipResult) -> Self {
        self.paymaster = Some(sponsorship.paymaster);
        self.paymaster_data = Some(sponsorship.paymaster_data.clone());
        self.paymaster_verification_gas_limit = Some(sponsorship.paymaster_verification_gas_limit);
        self.paymaster_post_op_gas_limit = Some(sponsorship.paymaster_post_op_gas_limit);
        self.pre_verification_gas = sponsorship.pre_verification_gas;
        self.verification_gas_limit = sponsorship.verification_gas_limit;
        self.call_gas_limit = sponsorship.call_gas_limit;
        self
    }
}

/// Receipt of the user operation (returned from the RPC endpoint eth_getUserOperationReceipt)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    #[serde(rename = "userOpHash")]
    pub user_operation_hash: UserOperationHash,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "as_checksum_addr_opt"
    )]
    pub entry_point: Option<Address>,
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,
    pub nonce: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    pub success: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(rename = "receipt")]
    pub tx_receipt: TransactionReceipt,
}

impl UserOperationReceipt {
    /// Hash of the bundle transaction that included the user operation
    pub fn transaction_hash(&self) -> H256 {
        self.tx_receipt.transaction_hash
    }
}

/// Gas estimations for user operation (returned from the RPC endpoint eth_estimateUserOperationGas)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationGasEstimation {
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_verification_gas_limit: Option<U256>,
}

/// Paymaster fields and gas limits (returned from the RPC endpoint pm_sponsorUserOperation)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipResult {
    pub paymaster: Address,
    pub paymaster_data: Bytes,
    pub paymaster_verification_gas_limit: U256,
    pub paymaster_post_op_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}

/// EIP-1559 fee pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPrice {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

/// Fee tiers (returned from the RPC endpoint pimlico_getUserOperationGasPrice)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPriceTiers {
    pub slow: GasPrice,
    pub standard: GasPrice,
    pub fast: GasPrice,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_operation() -> UserOperationSigned {
        UserOperationSigned::default()
            .sender("0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap())
            .nonce(1.into())
            .call_data("0xb61d27f6".parse().unwrap())
            .call_gas_limit(33_100.into())
            .verification_gas_limit(60_624.into())
            .pre_verification_gas(44_056.into())
            .max_fee_per_gas(1_695_000_030_u64.into())
            .max_priority_fee_per_gas(1_695_000_000.into())
    }

    #[test]
    fn user_operation_signed_pack_without_signature() {
        let uo = user_operation();
        let packed = uo.pack_without_signature();
        assert_eq!(packed.len(), 8 * 32);
        // sender is left padded to a word
        assert_eq!(&packed[12..32], uo.sender.as_bytes());
        // empty init code and paymaster data hash to keccak256("")
        let empty = keccak256([0u8; 0]);
        assert_eq!(&packed[64..96], &empty);
        assert_eq!(&packed[224..256], &empty);
        assert_eq!(&packed[128..160], &uo.account_gas_limits());
        assert_eq!(&packed[192..224], &uo.gas_fees());
    }

    #[test]
    fn user_operation_signed_hash() {
        let ep: Address = crate::constants::entry_point::ADDRESS.parse().unwrap();
        let uo = user_operation();

        assert_eq!(uo.hash(&ep, 84532), uo.hash(&ep, 84532));
        assert_ne!(uo.hash(&ep, 84532), uo.hash(&ep, 8453));
        // the signature is not part of the hash
        assert_eq!(
            uo.hash(&ep, 84532),
            uo.clone().signature("0x1234".parse().unwrap()).hash(&ep, 84532)
        );
        // the init code is
        assert_ne!(
            uo.hash(&ep, 84532),
            uo.clone().factory(Address::repeat_byte(1), "0x5fbfb9cf".parse().unwrap()).hash(&ep, 84532)
        );
    }

    #[test]
    fn user_operation_signed_serialize() {
        let uo = user_operation();
        let value = serde_json::to_value(&uo).unwrap();
        assert_eq!(value["sender"], ethers::utils::to_checksum(&uo.sender, None));
        assert_eq!(value["callGasLimit"], "0x814c");
        assert!(value.get("factory").is_none());
        assert!(value.get("paymaster").is_none());

        let value = serde_json::to_value(
            user_operation().factory(Address::repeat_byte(1), Bytes::default()),
        )
        .unwrap();
        assert_eq!(value["factory"], "0x0101010101010101010101010101010101010101");
        assert_eq!(value["factoryData"], "0x");
    }

    #[test]
    fn user_operation_signed_sponsorship() {
        let sponsorship = SponsorshipResult {
            paymaster: Address::repeat_byte(2),
            paymaster_data: "0xdeadbeef".parse().unwrap(),
            paymaster_verification_gas_limit: 30_000.into(),
            paymaster_post_op_gas_limit: 1.into(),
            pre_verification_gas: 50_000.into(),
            verification_gas_limit: 70_000.into(),
            call_gas_limit: 20_000.into(),
        };
        let uo = user_operation().sponsorship(&sponsorship);
        assert_eq!(uo.call_gas_limit, 20_000.into());
        assert_eq!(uo.paymaster_and_data().len(), 20 + 32 + 4);
        assert!(user_operation().paymaster_and_data().is_empty());
    }

    #[test]
    fn user_operation_receipt_deserialize() {
        let receipt: UserOperationReceipt = serde_json::from_value(serde_json::json!({
            "userOpHash": "0x7c1b8c9df49a9e09ecef0f0fe6841d895850d29820f9a4b494097764085dcd7e",
            "entryPoint": "0x0000000071727De22E5E9d8BAf0edAc6f37da032",
            "sender": "0x9c5754De1443984659E1b3a8d1931D83475ba29C",
            "nonce": "0x0",
            "actualGasCost": "0x1",
            "actualGasUsed": "0x1",
            "success": true,
            "logs": [],
            "receipt": {
                "transactionHash": "0x95418c07086df02ff6bc9e8bdc150b380cb761beecc098630440bcec6e862702",
                "transactionIndex": "0x0",
                "blockHash": "0x95418c07086df02ff6bc9e8bdc150b380cb761beecc098630440bcec6e862702",
                "blockNumber": "0x1",
                "from": "0x9c5754De1443984659E1b3a8d1931D83475ba29C",
                "to": "0x0000000071727De22E5E9d8BAf0edAc6f37da032",
                "cumulativeGasUsed": "0x1",
                "gasUsed": "0x1",
                "contractAddress": null,
                "logs": [],
                "status": "0x1",
                "logsBloom": format!("0x{}", "0".repeat(512)),
            }
        }))
        .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.reason, "");
        assert_eq!(
            receipt.transaction_hash(),
            "0x95418c07086df02ff6bc9e8bdc150b380cb761beecc098630440bcec6e862702".parse().unwrap()
        );
    }
}
