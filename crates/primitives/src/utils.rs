//! Misc utils

use ethers::{
    types::{Address, Bytes, U128, U256},
    utils::to_checksum,
};

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Converts Option address to checksum
pub fn as_checksum_addr_opt<S>(val: &Option<Address>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if let Some(addr) = val {
        s.serialize_str(&to_checksum(addr, None))
    } else {
        s.serialize_none()
    }
}

/// If possible, parses address from the first 20 bytes
pub fn get_address(buf: &[u8]) -> Option<Address> {
    if buf.len() >= 20 {
        Some(Address::from_slice(&buf[0..20]))
    } else {
        None
    }
}

/// `paymaster || paymasterVerificationGasLimit || paymasterPostOpGasLimit || paymasterData`, or
/// empty when there is no paymaster
pub fn pack_paymaster_data(
    addr: Address,
    paymaster_verification_gas_limit: U256,
    paymaster_post_op_gas_limit: U256,
    paymaster_data: &Bytes,
) -> Vec<u8> {
    if addr.is_zero() {
        vec![]
    } else {
        let gas_data = pack_uint128(paymaster_verification_gas_limit, paymaster_post_op_gas_limit);
        [addr.0.to_vec(), gas_data.to_vec(), paymaster_data.to_vec()].concat()
    }
}

/// `factory || factoryData`, or empty when the account is already deployed
pub fn pack_factory_data(factory: Address, factory_data: &Bytes) -> Vec<u8> {
    if factory.is_zero() {
        vec![]
    } else {
        [factory.0.to_vec(), factory_data.to_vec()].concat()
    }
}

/// Packs two uint128 (high, low) into one 32 bytes word
pub fn pack_uint128(a: U256, b: U256) -> [u8; 32] {
    let mut res = [0u8; 32];
    let a: U128 = {
        let mut tem = [0; 32];
        a.to_big_endian(&mut tem);
        U128::from_big_endian(&tem[16..32])
    };
    let b: U128 = {
        let mut tem = [0; 32];
        b.to_big_endian(&mut tem);
        U128::from_big_endian(&tem[16..32])
    };
    a.to_big_endian(&mut res[0..16]);
    b.to_big_endian(&mut res[16..32]);
    res
}
