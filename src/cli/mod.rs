//! Command-line interface.

pub mod diff;
pub mod export_key;
pub mod init;
pub mod install;
pub mod list;
pub mod lock;
pub mod new;
pub mod output;
pub mod unlock;

use clap::{Args, Parser, Subcommand};

use crate::core::config::{Config, Overrides};
use crate::error::{Error, Result};

/// Envlock - per-environment secret files, encrypted at rest.
#[derive(Parser)]
#[command(
    name = "envlock",
    about = "Manage per-environment secret files, encrypted at rest with git-crypt",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// The environment to install (no subcommand installs)
    #[arg(short, long)]
    pub environment: Option<String>,

    /// base64-encoded key for unlocking on demand
    #[arg(short, long)]
    pub key: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Configuration overrides shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Copy the environment file instead of symlinking
    #[arg(long, global = true)]
    pub copy: bool,

    /// Install-target path for the selected environment file
    #[arg(long, global = true)]
    pub target: Option<String>,

    /// Path to the template for new environments
    #[arg(long, global = true)]
    pub template: Option<String>,

    /// Naming pattern for environment files (must contain [name])
    #[arg(long, global = true)]
    pub environments: Option<String>,

    /// Disable encryption of environment files
    #[arg(long, global = true)]
    pub no_encrypt: bool,
}

impl ConfigArgs {
    fn to_overrides(&self, key: Option<String>) -> Overrides {
        Overrides {
            copy: self.copy,
            target: self.target.clone(),
            template: self.template.clone(),
            environments: self.environments.clone(),
            no_encrypt: self.no_encrypt,
            key,
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Write .envlock.toml and provision the repository
    Init {
        /// Accept defaults without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a new environment file from the template
    New {
        /// The name of the environment
        #[arg(short, long)]
        environment: Option<String>,
    },

    /// List discovered environments
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare variables across environment files
    Diff,

    /// Unlock the repository with a base64-encoded key
    Unlock {
        /// The base64-encoded key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Lock the repository, printing a key export first
    Lock,

    /// Export the symmetric key as base64
    ExportKey,
}

/// Convert a prompt failure into our error type.
pub(crate) fn prompt_err(e: dialoguer::Error) -> Error {
    Error::Other(format!("prompt failed: {}", e))
}

/// Whether interactive prompts are possible.
pub(crate) fn interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Execute a parsed invocation.
pub fn execute(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let overrides = cli.config.to_overrides(cli.key.clone());

    match cli.command {
        Some(Command::Init { yes }) => {
            let config = Config::load_or_default(&cwd)?.with_overrides(&overrides);
            init::execute(config, &cli.config, yes)
        }
        Some(Command::New { environment }) => {
            let config = Config::load(&cwd)?.with_overrides(&overrides);
            new::execute(&config, environment)
        }
        Some(Command::List { json }) => {
            let config = Config::load(&cwd)?.with_overrides(&overrides);
            list::execute(&config, json)
        }
        Some(Command::Diff) => {
            let config = Config::load(&cwd)?.with_overrides(&overrides);
            diff::execute(&config)
        }
        Some(Command::Unlock { key }) => {
            let config = Config::load(&cwd)?.with_overrides(&overrides);
            unlock::execute(&config, key)
        }
        Some(Command::Lock) => {
            let config = Config::load(&cwd)?.with_overrides(&overrides);
            lock::execute(&config)
        }
        Some(Command::ExportKey) => {
            let config = Config::load(&cwd)?.with_overrides(&overrides);
            export_key::execute(&config)
        }
        None => {
            let config = Config::load(&cwd)?.with_overrides(&overrides);
            install::execute(&config, cli.environment)
        }
    }
}
