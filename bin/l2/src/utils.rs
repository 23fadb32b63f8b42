use dialoguer::{Confirm, Input, Select};
use ethers::types::{Address, Bytes, U256};
use expanded_pathbuf::ExpandedPathBuf;
use l2_primitives::Network;
use l2_scaffold::{Settings, Template};
use pin_utils::pin_mut;
use std::{
    future::Future,
    io::IsTerminal,
    path::PathBuf,
    str::FromStr,
};
use tracing::info;

/// Unwrap path or returns the default settings file (`~/.l2-cli/config.toml`)
pub fn unwrap_path_or_default(path: Option<ExpandedPathBuf>) -> eyre::Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Settings::default_path()?),
    }
}

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses U256 (in wei) from string
pub fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_dec_str(s).map_err(|_| format!("String {s} is not a valid U256"))
}

/// Parses hex encoded call data (`0x` prefix optional)
pub fn parse_bytes(s: &str) -> Result<Bytes, String> {
    Bytes::from_str(s).map_err(|_| format!("String {s} is not valid hex data"))
}

pub fn parse_network(s: &str) -> Result<Network, String> {
    Network::from_str(s).map_err(|_| format!("String {s} is not a valid network"))
}

pub fn parse_template(s: &str) -> Result<Template, String> {
    Template::from_str(s).map_err(|_| format!("String {s} is not a valid template"))
}

pub fn validate_private_key(hex_string: &str) -> Result<String, String> {
    let key = hex_string.trim_start_matches("0x");

    if key.chars().count() != 64 {
        return Err(format!("{hex_string} is not a valid private key"));
    }

    if !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{hex_string} is not a valid hexadecimal string"));
    }

    Ok(String::from(key))
}

/// Prompts are only shown when stdin is a terminal
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

pub fn prompt_text(prompt: &str) -> eyre::Result<String> {
    Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
}

/// Lets the user pick one of `items`, starting at `default`
pub fn prompt_select<T>(prompt: &str, items: &[T], default: T) -> eyre::Result<T>
where
    T: Copy + PartialEq + ToString,
{
    let position = items.iter().position(|item| *item == default).unwrap_or_default();
    let index = Select::new().with_prompt(prompt).items(items).default(position).interact()?;
    items.get(index).copied().ok_or_else(|| eyre::eyre!("No item selected"))
}

pub fn prompt_confirm(prompt: &str) -> eyre::Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// Runs the future to completion or until:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
pub async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + 'static + From<std::io::Error>,
{
    let ctrl_c = tokio::signal::ctrl_c();

    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let sigterm = stream.recv();
    pin_mut!(sigterm, ctrl_c, fut);

    tokio::select! {
        _ = ctrl_c => {
            info!("Received ctrl-c signal.");
        },
        _ = sigterm => {
            info!("Received SIGTERM signal.");
        },
        res = fut => res?,
    }

    Ok(())
}
