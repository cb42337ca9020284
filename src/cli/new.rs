//! New command - create an environment file from the template.

use dialoguer::Input;
use tracing::info;

use crate::cli::{interactive, output, prompt_err};
use crate::core::config::Config;
use crate::core::environments;
use crate::error::{Error, Result};

/// Create a new environment file.
pub fn execute(config: &Config, environment: Option<String>) -> Result<()> {
    let name = match environment {
        Some(name) => name,
        None if interactive() => {
            let config = config.clone();
            Input::<String>::new()
                .with_prompt("Give the new environment a name")
                .validate_with(move |input: &String| {
                    environments::validate_name(&config, input).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?
        }
        None => {
            return Err(Error::Other(
                "no name given: pass --environment".to_string(),
            ))
        }
    };

    info!(name, "creating environment");
    let path = environments::create(config, &name)?;

    output::success(&format!(
        "created {} at {}",
        name,
        output::path(&path.display().to_string())
    ));
    Ok(())
}
