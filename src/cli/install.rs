//! Install command - place the selected environment at the target path.
//!
//! This is the default command: `envlock -e dev` (or an interactive
//! selection) installs the named environment file as a symlink or copy.

use dialoguer::Select;
use tracing::info;

use crate::cli::{interactive, output, prompt_err};
use crate::core::config::Config;
use crate::core::environments::{self, Environment};
use crate::core::lifecycle::{self, RepoStatus};
use crate::error::{Error, Result, ValidationError};

/// Resolve the environment to install, prompting when possible.
fn select_environment(config: &Config, requested: Option<String>) -> Result<Environment> {
    let environments = environments::discover(config, false)?;

    let selected = match requested {
        Some(name) => name,
        None if interactive() => {
            let names: Vec<&str> = environments.iter().map(|e| e.name.as_str()).collect();
            let index = Select::new()
                .with_prompt("Select the environment to install")
                .items(&names)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            names[index].to_string()
        }
        None => {
            return Err(Error::Other(
                "no environment selected: pass --environment".to_string(),
            ))
        }
    };

    environments
        .into_iter()
        .find(|env| env.name == selected)
        .ok_or_else(|| Error::Other(format!("file not found for environment \"{}\"", selected)))
}

/// Install an environment file at the configured target.
pub fn execute(config: &Config, environment: Option<String>) -> Result<()> {
    // Unlock on demand before touching encrypted files.
    if config.encrypt {
        let status = lifecycle::guard(
            config,
            &[(RepoStatus::Empty, "run `envlock init` first")],
        )?;

        if status == RepoStatus::Locked {
            output::warn("repository is locked; unlocking");
            let key = match &config.key {
                Some(key) => key.clone(),
                None if interactive() => dialoguer::Password::new()
                    .with_prompt("Paste the base64-encoded key")
                    .interact()
                    .map_err(prompt_err)?,
                None => {
                    return Err(Error::Other(
                        "repository is locked: pass --key to unlock".to_string(),
                    ))
                }
            };
            lifecycle::unlock(config, &key)?;
        }
    }

    let environment = select_environment(config, environment)?;
    let target = config.target_path();

    // Safe-guard against general exploitation of globs.
    if target.display().to_string().contains('*') {
        return Err(ValidationError::UnsafeTarget(target.display().to_string()).into());
    }

    info!(source = %environment.relative.display(), target = %target.display(), "installing");

    match std::fs::remove_file(&target) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    if config.copy {
        std::fs::copy(&environment.path, &target)?;
    } else {
        #[cfg(unix)]
        std::os::unix::fs::symlink(&environment.path, &target)?;
        #[cfg(not(unix))]
        std::fs::copy(&environment.path, &target)?;
    }

    output::success(&format!(
        "installed {} at {}",
        environment.name,
        output::path(&config.target)
    ));
    Ok(())
}
