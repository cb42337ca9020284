//! Unlock command - decrypt the working tree with a supplied key.

use crate::cli::{interactive, output, prompt_err};
use crate::core::config::Config;
use crate::core::lifecycle::{self, RepoStatus};
use crate::error::{Error, Result};

/// Unlock the repository.
pub fn execute(config: &Config, key: Option<String>) -> Result<()> {
    lifecycle::guard(
        config,
        &[
            (RepoStatus::Empty, "run `envlock init` first"),
            (RepoStatus::Ready, "repository already unlocked"),
        ],
    )?;

    let key = match key.or_else(|| config.key.clone()) {
        Some(key) => key,
        None if interactive() => dialoguer::Password::new()
            .with_prompt("Paste the base64-encoded key")
            .interact()
            .map_err(prompt_err)?,
        None => return Err(Error::Other("no key given: pass --key".to_string())),
    };

    lifecycle::unlock(config, &key)?;
    output::success("repository unlocked");
    Ok(())
}
