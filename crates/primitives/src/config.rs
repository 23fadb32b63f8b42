//! Endpoint configuration for the smart account client

use crate::constants::endpoints::{
    BUNDLER_URL_ENV, DEFAULT_RPC_URL, PAYMASTER_URL_ENV, PLACEHOLDER_MARKER, RPC_URL_ENV,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Raw endpoint values as found in the environment (or passed on the command line)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSettings {
    pub rpc_url: Option<String>,
    pub bundler_url: Option<String>,
    pub paymaster_url: Option<String>,
}

impl EndpointSettings {
    /// Reads `RPC_URL`, `BUNDLER_URL` and `PAYMASTER_URL` from the process environment
    pub fn from_env() -> Self {
        Self {
            rpc_url: std::env::var(RPC_URL_ENV).ok(),
            bundler_url: std::env::var(BUNDLER_URL_ENV).ok(),
            paymaster_url: std::env::var(PAYMASTER_URL_ENV).ok(),
        }
    }
}

/// Whether the operation gas is paid by the account or sponsored by a paymaster service
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Paymaster {
    None,
    Sponsored(Url),
}

impl Paymaster {
    pub fn is_sponsored(&self) -> bool {
        matches!(self, Paymaster::Sponsored(_))
    }
}

impl fmt::Display for Paymaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paymaster::None => write!(f, "none"),
            Paymaster::Sponsored(url) => write!(f, "sponsored ({url})"),
        }
    }
}

/// Validated endpoints, fixed for the lifetime of a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bundler JSON-RPC endpoint
    pub bundler_url: Url,
    /// Optional paymaster sponsoring the gas
    pub paymaster: Paymaster,
    /// Execution client JSON-RPC endpoint (balance and bytecode queries)
    pub rpc_url: Url,
}

/// Endpoint configuration that cannot be used as is
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Bundler URL not configured. Please add BUNDLER_URL to your .env file.")]
    MissingBundlerUrl,
    #[error("Bundler URL {0} is a placeholder. Please set BUNDLER_URL in your .env file.")]
    PlaceholderBundlerUrl(String),
    #[error("{name} {value} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, value: String, reason: String },
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_placeholder(value: &str) -> bool {
    value.contains(PLACEHOLDER_MARKER)
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigurationError> {
    Url::parse(value).map_err(|err| ConfigurationError::InvalidUrl {
        name,
        value: value.to_string(),
        reason: err.to_string(),
    })
}

impl TryFrom<&EndpointSettings> for ClientConfig {
    type Error = ConfigurationError;

    fn try_from(settings: &EndpointSettings) -> Result<Self, Self::Error> {
        let bundler = present(&settings.bundler_url).ok_or(ConfigurationError::MissingBundlerUrl)?;
        if is_placeholder(bundler) {
            return Err(ConfigurationError::PlaceholderBundlerUrl(bundler.to_string()));
        }
        let bundler_url = parse_url(BUNDLER_URL_ENV, bundler)?;

        let paymaster = match present(&settings.paymaster_url) {
            Some(url) if !is_placeholder(url) => {
                Paymaster::Sponsored(parse_url(PAYMASTER_URL_ENV, url)?)
            }
            _ => Paymaster::None,
        };

        let rpc_url = parse_url(RPC_URL_ENV, present(&settings.rpc_url).unwrap_or(DEFAULT_RPC_URL))?;

        Ok(Self { bundler_url, paymaster, rpc_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(bundler: Option<&str>, paymaster: Option<&str>) -> EndpointSettings {
        EndpointSettings {
            rpc_url: None,
            bundler_url: bundler.map(String::from),
            paymaster_url: paymaster.map(String::from),
        }
    }

    #[test]
    fn missing_bundler_url() {
        assert_eq!(
            ClientConfig::try_from(&settings(None, None)),
            Err(ConfigurationError::MissingBundlerUrl)
        );
        assert_eq!(
            ClientConfig::try_from(&settings(Some("  "), None)),
            Err(ConfigurationError::MissingBundlerUrl)
        );
    }

    #[test]
    fn placeholder_bundler_url() {
        let res = ClientConfig::try_from(&settings(
            Some("https://api.pimlico.io/v2/84532/rpc?apikey=YOUR_API_KEY"),
            None,
        ));
        assert!(matches!(res, Err(ConfigurationError::PlaceholderBundlerUrl(_))));
    }

    #[test]
    fn paymaster_is_optional() {
        let config =
            ClientConfig::try_from(&settings(Some("https://bundler.example.org"), None)).unwrap();
        assert_eq!(config.paymaster, Paymaster::None);
        assert_eq!(config.rpc_url.as_str(), "https://sepolia.base.org/");

        let config = ClientConfig::try_from(&settings(
            Some("https://bundler.example.org"),
            Some("https://paymaster.example.org/YOUR_KEY"),
        ))
        .unwrap();
        assert_eq!(config.paymaster, Paymaster::None);

        let config = ClientConfig::try_from(&settings(
            Some("https://bundler.example.org"),
            Some("https://paymaster.example.org"),
        ))
        .unwrap();
        assert!(config.paymaster.is_sponsored());
    }

    #[test]
    fn invalid_url() {
        let res = ClientConfig::try_from(&settings(Some("not a url"), None));
        assert!(matches!(res, Err(ConfigurationError::InvalidUrl { name: "BUNDLER_URL", .. })));
    }
}
