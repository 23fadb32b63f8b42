//! L2 networks the scaffolder and the smart account client know about

use alloy_chains::NamedChain;
use ethers::types::H256;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, EnumVariantNames};

/// Supported L2 network
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    EnumVariantNames,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab_case")]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    Base,
    BaseSepolia,
    Optimism,
    OptimismSepolia,
}

impl Network {
    pub fn named_chain(&self) -> NamedChain {
        match self {
            Network::Base => NamedChain::Base,
            Network::BaseSepolia => NamedChain::BaseSepolia,
            Network::Optimism => NamedChain::Optimism,
            Network::OptimismSepolia => NamedChain::OptimismSepolia,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.named_chain() as u64
    }

    /// Name of the chain export in `wagmi/chains` (also used as the JS identifier)
    pub fn wagmi_import(&self) -> &'static str {
        match self {
            Network::Base => "base",
            Network::BaseSepolia => "baseSepolia",
            Network::Optimism => "optimism",
            Network::OptimismSepolia => "optimismSepolia",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Base => "Base",
            Network::BaseSepolia => "Base Sepolia",
            Network::Optimism => "Optimism",
            Network::OptimismSepolia => "Optimism Sepolia",
        }
    }

    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Base => "https://mainnet.base.org",
            Network::BaseSepolia => "https://sepolia.base.org",
            Network::Optimism => "https://mainnet.optimism.io",
            Network::OptimismSepolia => "https://sepolia.optimism.io",
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Base => "https://basescan.org",
            Network::BaseSepolia => "https://sepolia.basescan.org",
            Network::Optimism => "https://optimistic.etherscan.io",
            Network::OptimismSepolia => "https://sepolia-optimism.etherscan.io",
        }
    }

    pub fn docs_url(&self) -> &'static str {
        match self {
            Network::Base | Network::BaseSepolia => "https://docs.base.org",
            Network::Optimism | Network::OptimismSepolia => "https://docs.optimism.io",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::BaseSepolia | Network::OptimismSepolia)
    }

    /// Block explorer link to a mined transaction
    pub fn tx_url(&self, tx_hash: &H256) -> String {
        format!("{}/tx/{tx_hash:?}", self.explorer_url())
    }
}
