use ethers::{
    abi::AbiEncode,
    contract::abigen,
    types::{Address, Bytes, U256},
};
use l2_primitives::Call;

abigen!(
    SimpleAccountFactory,
    r#"[
        function createAccount(address owner,uint256 salt) public returns (address ret)
        function getAddress(address owner,uint256 salt) public view returns (address)
    ]"#
);

abigen!(
    SimpleAccount,
    r#"[
        function execute(address dest,uint256 value,bytes calldata func) external
        function executeBatch(address[] calldata dest,uint256[] calldata value,bytes[] calldata func) external
    ]"#
);

abigen!(
    EntryPoint,
    r#"[
        function getNonce(address sender,uint192 key) public view returns (uint256 nonce)
    ]"#
);

/// Factory call data deploying the account of `owner`
pub fn create_account_call(owner: Address, salt: U256) -> Bytes {
    CreateAccountCall { owner, salt }.encode().into()
}

/// Account call data executing `calls` (a single `execute` or an `executeBatch`)
pub fn execute_calls(calls: Vec<Call>) -> Bytes {
    let data = match <[Call; 1]>::try_from(calls) {
        Ok([call]) => ExecuteCall { dest: call.to, value: call.value, func: call.data }.encode(),
        Err(calls) => {
            let mut batch = ExecuteBatchCall { dest: vec![], value: vec![], func: vec![] };
            for call in calls {
                batch.dest.push(call.to);
                batch.value.push(call.value);
                batch.func.push(call.data);
            }
            batch.encode()
        }
    };
    data.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{abi::AbiDecode, contract::EthCall};

    #[test]
    fn single_call_uses_execute() {
        let call =
            Call { to: Address::repeat_byte(2), value: 5.into(), data: vec![0xab, 0xcd].into() };
        let data = execute_calls(vec![call.clone()]);
        assert_eq!(&data[..4], &ExecuteCall::selector());

        let decoded = ExecuteCall::decode(&data).unwrap();
        assert_eq!(decoded.dest, call.to);
        assert_eq!(decoded.value, call.value);
        assert_eq!(decoded.func, call.data);
    }

    #[test]
    fn multiple_calls_use_execute_batch() {
        let calls = vec![
            Call { to: Address::repeat_byte(1), ..Default::default() },
            Call { to: Address::repeat_byte(2), value: 1.into(), ..Default::default() },
        ];
        let data = execute_calls(calls);
        assert_eq!(&data[..4], &ExecuteBatchCall::selector());

        let decoded = ExecuteBatchCall::decode(&data).unwrap();
        assert_eq!(decoded.dest, vec![Address::repeat_byte(1), Address::repeat_byte(2)]);
        assert_eq!(decoded.value, vec![U256::zero(), U256::one()]);
    }

    #[test]
    fn create_account() {
        let data = create_account_call(Address::repeat_byte(3), U256::zero());
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &CreateAccountCall::selector());
    }
}
