//! Init command - write `.envlock.toml` and provision the repository.

use dialoguer::{Confirm, Input};
use tracing::info;

use crate::cli::{interactive, output, prompt_err, ConfigArgs};
use crate::core::config::Config;
use crate::core::git_crypt;
use crate::core::lifecycle::{self, RepoStatus};
use crate::core::steps::StepId;
use crate::error::{Result, ToolError};

/// Fill in configuration values not supplied as flags.
///
/// Prompts run only on a TTY and only for fields the user did not pass;
/// scripted invocations get defaults.
fn prompt_missing(config: &mut Config, args: &ConfigArgs) -> Result<()> {
    if !args.copy {
        config.copy = Confirm::new()
            .with_prompt("Copy instead of symlink when installing?")
            .default(config.copy)
            .interact()
            .map_err(prompt_err)?;
    }

    if args.target.is_none() {
        config.target = Input::new()
            .with_prompt("Target env file path")
            .default(config.target.clone())
            .interact_text()
            .map_err(prompt_err)?;
    }

    if args.template.is_none() {
        config.template = Input::new()
            .with_prompt("Template file path")
            .default(config.template.clone())
            .interact_text()
            .map_err(prompt_err)?;
    }

    if args.environments.is_none() {
        config.environments = Input::new()
            .with_prompt("Path pattern to environment files")
            .default(config.environments.clone())
            .interact_text()
            .map_err(prompt_err)?;
    }

    if !args.no_encrypt {
        config.encrypt = Confirm::new()
            .with_prompt("Encrypt environment files with git-crypt?")
            .default(config.encrypt)
            .interact()
            .map_err(prompt_err)?;
    }

    Ok(())
}

/// Initialize envlock in the current directory.
pub fn execute(mut config: Config, args: &ConfigArgs, yes: bool) -> Result<()> {
    // Re-initialization from a ready repository is allowed; a locked one
    // must be unlocked first.
    lifecycle::guard(
        &config,
        &[(
            RepoStatus::Locked,
            "unlock first with `envlock unlock`",
        )],
    )?;

    if !yes && interactive() {
        prompt_missing(&mut config, args)?;
    }

    // Only a provisioning pass that still needs key material touches
    // git-crypt; fail early when that is about to happen.
    if config.encrypt && !StepId::KeyMaterial.done(&config)? && config.key.is_none()
        && !git_crypt::is_available()
    {
        return Err(ToolError::NotInstalled.into());
    }

    info!(pattern = %config.environments, encrypt = config.encrypt, "initializing");

    config.save()?;
    output::success(&format!("wrote {}", output::path(".envlock.toml")));

    lifecycle::configure(&config)?;
    output::success("repository provisioned");

    output::kv("pattern", &config.environments);
    output::kv("target", &config.target);
    output::kv("encrypt", config.encrypt);
    Ok(())
}
