//! List command - enumerate discovered environments.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::environments;
use crate::error::{Error, Result};

/// List environments matching the naming pattern.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let environments = environments::discover(config, true)?;

    if json {
        let entries: Vec<serde_json::Value> = environments
            .iter()
            .map(|env| {
                serde_json::json!({
                    "name": env.name,
                    "path": env.relative.display().to_string(),
                })
            })
            .collect();
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| Error::Other(e.to_string()))?;
        println!("{}", rendered);
        return Ok(());
    }

    if environments.is_empty() {
        output::dimmed(&format!("no environment found at {}", config.environments));
        return Ok(());
    }

    for env in &environments {
        output::kv(&env.name, env.relative.display());
    }
    Ok(())
}
