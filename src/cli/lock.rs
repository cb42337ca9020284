//! Lock command - re-encrypt the working tree.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::lifecycle::{self, RepoStatus};
use crate::error::Result;

/// Lock the repository.
///
/// The key is exported before locking removes access to it; it is printed
/// so the caller can unlock again later.
pub fn execute(config: &Config) -> Result<()> {
    lifecycle::guard(
        config,
        &[
            (RepoStatus::Empty, "run `envlock init` first"),
            (RepoStatus::Locked, "repository already locked"),
        ],
    )?;

    let key = lifecycle::lock(config)?;

    output::success("repository locked");
    output::warn("store this key somewhere safe; you need it to unlock:");
    println!("{}", key);
    Ok(())
}
