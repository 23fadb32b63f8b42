//! Account abstraction (ERC-4337) and scaffolding constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";
    /// Version of the entry point smart contract
    pub const VERSION: &str = "0.7";
}

/// SimpleAccount (entry point v0.7) deployment
pub mod simple_account {
    /// Address of the SimpleAccountFactory
    pub const FACTORY: &str = "0x91E60e0613810449d098b0b5Ec8b51A0FE8c8985";
    /// Salt used when deriving the account address from the owner
    pub const SALT: u64 = 0;
    /// Signature with the right length and shape, used only for gas estimation
    pub const DUMMY_SIGNATURE: &str = "0xfffffffffffffffffffffffffffffff0000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c";
}

/// Endpoints and environment
pub mod endpoints {
    /// Public RPC endpoint used when `RPC_URL` is not set (Base Sepolia)
    pub const DEFAULT_RPC_URL: &str = "https://sepolia.base.org";
    /// Marker that template `.env` files use for values the user still has to fill in
    pub const PLACEHOLDER_MARKER: &str = "YOUR_";

    pub const RPC_URL_ENV: &str = "RPC_URL";
    pub const BUNDLER_URL_ENV: &str = "BUNDLER_URL";
    pub const PAYMASTER_URL_ENV: &str = "PAYMASTER_URL";
}

/// User operation receipt polling
pub mod receipt {
    /// Interval between `eth_getUserOperationReceipt` calls (in milliseconds)
    pub const POLL_INTERVAL_MS: u64 = 1000;
    /// Time after which waiting for a receipt gives up (in seconds)
    pub const TIMEOUT_SECS: u64 = 120;
}

/// User settings file
pub mod settings {
    /// Directory (relative to home) holding the settings file
    pub const DIR_NAME: &str = ".l2-cli";
    /// Settings file name
    pub const FILE_NAME: &str = "config.toml";
}
