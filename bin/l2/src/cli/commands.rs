use super::args::{AccountArgs, CallArgs};
use crate::utils::{
    is_interactive, parse_network, parse_template, prompt_confirm, prompt_select, prompt_text,
    unwrap_path_or_default,
};
use clap::{Parser, Subcommand};
use ethers::signers::LocalWallet;
use expanded_pathbuf::ExpandedPathBuf;
use l2_account::{EthersBackend, SessionState, SmartAccountManager, TransactionTracker};
use l2_primitives::{Network, TransactionStatus};
use l2_scaffold::{
    doctor, scaffold, Defaults, ScaffoldOptions, Settings, Template, SETTINGS_KEYS,
};
use std::{path::PathBuf, sync::Arc};
use strum::IntoEnumIterator;
use tracing::info;

/// Location of the settings file
#[derive(Debug, Clone, Parser)]
pub struct SettingsArgs {
    /// Path to the settings file.
    ///
    /// By default, `~/.l2-cli/config.toml` is used.
    #[clap(long = "config", global = true)]
    pub config_path: Option<ExpandedPathBuf>,
}

impl SettingsArgs {
    pub fn path(&self) -> eyre::Result<PathBuf> {
        unwrap_path_or_default(self.config_path.clone())
    }
}

/// Create a new L2 project
#[derive(Debug, Parser)]
pub struct InitCommand {
    /// Name of the project (and of the created directory). Prompted for when omitted.
    name: Option<String>,

    /// Target network. Prompted for (or the saved default) when omitted.
    #[clap(long, value_parser=parse_network)]
    network: Option<Network>,

    /// Project template. Prompted for (or the saved default) when omitted.
    #[clap(long, value_parser=parse_template)]
    template: Option<Template>,

    /// Directory the project is created in.
    #[clap(long, default_value = ".")]
    dir: PathBuf,

    #[clap(flatten)]
    settings: SettingsArgs,
}

impl InitCommand {
    /// Fills in what was not passed on the command line, prompting only if `interactive`
    fn options(self, defaults: &Defaults, interactive: bool) -> eyre::Result<ScaffoldOptions> {
        let name = match self.name {
            Some(name) => name,
            None if interactive => prompt_text("Project name")?,
            None => return Err(eyre::eyre!("Project name is required outside a terminal")),
        };

        let network = match self.network {
            Some(network) => network,
            None if interactive => {
                let networks: Vec<Network> = Network::iter().collect();
                prompt_select("Select network", &networks, defaults.network)?
            }
            None => defaults.network,
        };

        let template = match self.template {
            Some(template) => template,
            None if interactive => {
                let templates: Vec<Template> = Template::iter().collect();
                prompt_select("Select template", &templates, defaults.template)?
            }
            None => defaults.template,
        };

        Ok(ScaffoldOptions { name, network, template, parent: self.dir })
    }

    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        self.execute_with(is_interactive())
    }

    pub fn execute_with(self, interactive: bool) -> eyre::Result<()> {
        let defaults = Settings::load(&self.settings.path()?)?.defaults;
        let options = self.options(&defaults, interactive)?;

        let report = scaffold(&options)?;

        println!(
            "Created {} ({}) on {} in {}",
            options.name,
            options.template.description(),
            options.network.display_name(),
            report.root.display()
        );
        for file in &report.files {
            println!("  {}", file.display());
        }
        println!("\nNext steps:");
        println!("  cd {}", options.name.trim());
        for step in &report.next_steps {
            println!("  {step}");
        }
        Ok(())
    }
}

/// Manage the saved defaults
#[derive(Debug, Parser)]
pub struct ConfigCommand {
    #[clap(subcommand)]
    action: ConfigAction,

    #[clap(flatten)]
    settings: SettingsArgs,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the value of a key
    Get { key: String },

    /// Set the value of a key
    Set { key: String, value: String },

    /// Print all keys with their values
    List,

    /// Restore the defaults
    Reset {
        /// Skip the confirmation prompt.
        #[clap(long)]
        yes: bool,
    },
}

impl ConfigCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        self.execute_with(is_interactive())
    }

    pub fn execute_with(self, interactive: bool) -> eyre::Result<()> {
        let path = self.settings.path()?;

        match self.action {
            ConfigAction::Get { key } => {
                println!("{}", Settings::load(&path)?.get_value(&key)?);
            }
            ConfigAction::Set { key, value } => {
                let mut settings = Settings::load(&path)?;
                settings.set_value(&key, &value)?;
                settings.save(&path)?;
                println!("{key} = {value}");
            }
            ConfigAction::List => {
                for (key, value) in Settings::load(&path)?.entries() {
                    println!("{key} = {value}");
                }
                println!("\nConfig file: {}", path.display());
            }
            ConfigAction::Reset { yes } => {
                if !yes {
                    if !interactive {
                        return Err(eyre::eyre!(
                            "Resetting restores {} to the defaults, pass --yes to confirm",
                            SETTINGS_KEYS.join(", ")
                        ));
                    }
                    if !prompt_confirm("Reset config?")? {
                        println!("Cancelled");
                        return Ok(());
                    }
                }
                Settings::default().save(&path)?;
                println!("Configuration reset to defaults");
            }
        }
        Ok(())
    }
}

/// Check the development environment
#[derive(Debug, Parser)]
pub struct DoctorCommand {
    #[clap(flatten)]
    settings: SettingsArgs,
}

impl DoctorCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let report = doctor::run(&self.settings.path()?);

        for check in &report.checks {
            let mark = if check.passed { "ok" } else if check.required { "missing" } else { "warn" };
            match &check.detail {
                Some(detail) => println!("[{mark}] {}: {detail}", check.name),
                None => println!("[{mark}] {}", check.name),
            }
            if let Some(hint) = &check.hint {
                println!("       {hint}");
            }
        }

        if report.all_passed() {
            println!("\nAll checks passed");
        } else if report.core_ready() {
            println!("\nCore tools are installed");
        } else {
            return Err(eyre::eyre!("Required tools are missing"));
        }
        Ok(())
    }
}

/// Smart account (ERC-4337) commands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Print the smart account address of the owner and whether it is deployed
    #[command(name = "address")]
    Address(AccountArgs),

    /// Send a (gasless when a paymaster is configured) transaction from the smart account
    #[command(name = "send")]
    Send {
        #[clap(flatten)]
        account: AccountArgs,

        #[clap(flatten)]
        call: CallArgs,
    },
}

type Manager = SmartAccountManager<EthersBackend<LocalWallet>>;

async fn connect(args: &AccountArgs) -> eyre::Result<Manager> {
    let wallet = args.wallet.to_wallet(args.network.chain_id())?;
    info!("Owner {:?} on {}", wallet.address(), args.network.display_name());

    let backend = Arc::new(EthersBackend::new()?);
    let manager = SmartAccountManager::new(backend, args.endpoints.to_settings(args.network));

    match manager.connect(wallet.signer).await {
        SessionState::Ready(_) => Ok(manager),
        state => Err(eyre::eyre!("{state}")),
    }
}

impl AccountCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        match self {
            AccountCommand::Address(args) => {
                let manager = connect(&args).await?;
                let view = manager.view();
                if let Some(address) = view.address {
                    println!("Smart account: {address:?}");
                }
                println!("Deployed: {}", view.is_deployed);
                Ok(())
            }
            AccountCommand::Send { account, call } => {
                let manager = connect(&account).await?;
                let network = account.network;

                let mut tracker = TransactionTracker::new().with_observer(|status| match status {
                    TransactionStatus::Sending => println!("Sending user operation..."),
                    TransactionStatus::Pending => println!("Waiting for the bundler to include it..."),
                    _ => {}
                });

                match tracker.send(&manager, call.into()).await {
                    TransactionStatus::Success(tx_hash) => {
                        println!("Transaction confirmed: {}", network.tx_url(tx_hash));
                        Ok(())
                    }
                    TransactionStatus::Error(message) => Err(eyre::eyre!("{message}")),
                    status => Err(eyre::eyre!("Unexpected transaction status: {status}")),
                }
            }
        }
    }
}
