//! Export-key command - print the symmetric key as base64.

use crate::core::config::Config;
use crate::core::lifecycle::{self, RepoStatus};
use crate::error::Result;

/// Print the base64 export of the key material.
pub fn execute(config: &Config) -> Result<()> {
    lifecycle::guard(
        config,
        &[
            (RepoStatus::Empty, "run `envlock init` first"),
            (RepoStatus::Locked, "run `envlock unlock` first"),
        ],
    )?;

    println!("{}", lifecycle::export_key(config)?);
    Ok(())
}
