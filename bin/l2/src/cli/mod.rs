use crate::utils::run_until_ctrl_c;
use clap::{value_parser, Parser, Subcommand};

pub mod args;
pub mod commands;

/// The main L2 CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "L2 - scaffold L2 dapps and transact through ERC-4337 smart accounts", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 1, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a template
    #[command(name = "init")]
    Init(commands::InitCommand),

    /// Get, set, list or reset the saved defaults
    #[command(name = "config")]
    Config(commands::ConfigCommand),

    /// Check the development environment
    #[command(name = "doctor")]
    Doctor(commands::DoctorCommand),

    /// Smart account address and gasless transactions
    #[command(subcommand, name = "account")]
    Account(commands::AccountCommand),
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let rust_log = match std::env::var("RUST_LOG") {
        Ok(val) => format!("{val},l2={}", cli.get_log_level()),
        Err(_) => format!("l2={}", cli.get_log_level()),
    };
    std::env::set_var("RUST_LOG", rust_log);
    tracing_subscriber::fmt::init();

    match cli.command {
        Commands::Init(command) => command.execute(),
        Commands::Config(command) => command.execute(),
        Commands::Doctor(command) => command.execute(),
        Commands::Account(command) => {
            let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
            rt.block_on(run_until_ctrl_c(command.execute()))
        }
    }
}
