//! Envlock - per-environment secret files, encrypted at rest.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envlock::cli::{execute, output, Cli};
use envlock::error::{ConfigError, Error, ToolError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("ENVLOCK_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envlock=debug")
        } else {
            EnvFilter::new("envlock=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized) => Some("run: envlock init"),
            Error::Tool(ToolError::NotInstalled) => Some("install git-crypt and retry"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
