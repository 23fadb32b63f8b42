use crate::utils::{parse_address, parse_bytes, parse_network, parse_u256, validate_private_key};
use clap::Parser;
use ethers::types::{Address, Bytes, U256};
use l2_primitives::{
    constants::endpoints::{BUNDLER_URL_ENV, PAYMASTER_URL_ENV, RPC_URL_ENV},
    EndpointSettings, Network, UserOperationRequest, Wallet,
};
use std::path::PathBuf;

/// Endpoints of the execution client, the bundler and the paymaster
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct EndpointArgs {
    /// Execution client JSON-RPC endpoint.
    ///
    /// By default, the public RPC of the selected network is used.
    #[clap(long, env = RPC_URL_ENV)]
    pub rpc_url: Option<String>,

    /// ERC-4337 bundler JSON-RPC endpoint.
    #[clap(long, env = BUNDLER_URL_ENV)]
    pub bundler_url: Option<String>,

    /// Paymaster JSON-RPC endpoint sponsoring the gas (optional).
    #[clap(long, env = PAYMASTER_URL_ENV)]
    pub paymaster_url: Option<String>,
}

impl EndpointArgs {
    /// Raw endpoint settings, validated when the session connects
    pub fn to_settings(&self, network: Network) -> EndpointSettings {
        EndpointSettings {
            rpc_url: self.rpc_url.clone().or_else(|| Some(network.rpc_url().to_string())),
            bundler_url: self.bundler_url.clone(),
            paymaster_url: self.paymaster_url.clone(),
        }
    }
}

/// Owner of the smart account
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct WalletArgs {
    /// Path to the file with the mnemonic phrase of the owner.
    #[clap(long, conflicts_with = "private_key", required_unless_present = "private_key")]
    pub mnemonic_file: Option<PathBuf>,

    /// Hex encoded private key of the owner.
    #[clap(long, value_parser=validate_private_key)]
    pub private_key: Option<String>,
}

impl WalletArgs {
    pub fn to_wallet(&self, chain_id: u64) -> eyre::Result<Wallet> {
        match (&self.mnemonic_file, &self.private_key) {
            (Some(path), _) => Wallet::from_file(path.clone().into(), chain_id),
            (None, Some(key)) => Wallet::from_key(key, chain_id),
            (None, None) => Err(eyre::eyre!("Either --mnemonic-file or --private-key is required")),
        }
    }
}

/// Smart account session args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct AccountArgs {
    /// Network the smart account lives on.
    ///
    /// By default, this option is set to `base-sepolia`.
    #[clap(long, default_value = "base-sepolia", value_parser=parse_network)]
    pub network: Network,

    #[clap(flatten)]
    pub endpoints: EndpointArgs,

    #[clap(flatten)]
    pub wallet: WalletArgs,
}

/// Call executed by the smart account
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct CallArgs {
    /// Address that is called.
    #[clap(long, value_parser=parse_address)]
    pub target: Address,

    /// Value in wei.
    #[clap(long, default_value = "0", value_parser=parse_u256)]
    pub value: U256,

    /// Hex encoded call data.
    #[clap(long, default_value = "0x", value_parser=parse_bytes)]
    pub data: Bytes,
}

impl From<CallArgs> for UserOperationRequest {
    fn from(args: CallArgs) -> Self {
        UserOperationRequest::new(args.target).value(args.value).data(args.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn account_args() {
        let args = vec![
            "accountargs",
            "--network",
            "optimism-sepolia",
            "--rpc-url",
            "http://127.0.0.1:8545",
            "--bundler-url",
            "http://127.0.0.1:3000",
            "--private-key",
            KEY,
        ];
        assert_eq!(
            AccountArgs {
                network: Network::OptimismSepolia,
                endpoints: EndpointArgs {
                    rpc_url: Some(String::from("http://127.0.0.1:8545")),
                    bundler_url: Some(String::from("http://127.0.0.1:3000")),
                    paymaster_url: None,
                },
                wallet: WalletArgs { mnemonic_file: None, private_key: Some(String::from(KEY)) },
            },
            AccountArgs::try_parse_from(args).unwrap()
        );
    }

    #[test]
    fn wallet_is_required() {
        assert!(WalletArgs::try_parse_from(vec!["walletargs"]).is_err());
        assert!(WalletArgs::try_parse_from(vec![
            "walletargs",
            "--mnemonic-file",
            "/tmp/mnemonic",
            "--private-key",
            KEY
        ])
        .is_err());
        assert!(WalletArgs::try_parse_from(vec!["walletargs", "--private-key", "0x1234"]).is_err());
    }

    #[test]
    fn wallet_from_private_key() {
        let args = WalletArgs { mnemonic_file: None, private_key: Some(String::from(KEY)) };
        let wallet = args.to_wallet(84532).unwrap();
        assert_eq!(
            wallet.address(),
            Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap()
        );
    }

    #[test]
    fn rpc_url_follows_network() {
        let args = EndpointArgs {
            rpc_url: None,
            bundler_url: Some(String::from("https://bundler.example.org")),
            paymaster_url: None,
        };
        let settings = args.to_settings(Network::Optimism);
        assert_eq!(settings.rpc_url.as_deref(), Some("https://mainnet.optimism.io"));
        assert_eq!(settings.bundler_url.as_deref(), Some("https://bundler.example.org"));
    }

    #[test]
    fn call_args() {
        let args = vec![
            "callargs",
            "--target",
            "0x0101010101010101010101010101010101010101",
            "--value",
            "1000",
        ];
        let request = UserOperationRequest::from(CallArgs::try_parse_from(args).unwrap());
        assert_eq!(request.value, U256::from(1000));
        assert!(request.data.is_empty());
    }
}
