//! Environment discovery and creation.
//!
//! Environments are concrete files matching the naming pattern; they are
//! re-discovered from the filesystem on every call, never cached.

use std::path::PathBuf;

use tracing::debug;

use crate::core::config::Config;
use crate::core::pattern::PLACEHOLDER;
use crate::error::{DiscoveryError, PatternError, Result, ValidationError};

/// One named, discoverable secret-configuration file.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Logical name captured from the path.
    pub name: String,
    /// Absolute file path.
    pub path: PathBuf,
    /// Path relative to the repository root.
    pub relative: PathBuf,
}

const DEFAULT_TEMPLATE: &str = "# Environment: [name]\n";

/// Character set accepted for user-supplied environment names.
const NAME_PATTERN: &str = "[\\w\\-.]+";

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Resolve environment paths and their names.
///
/// Every file matched by the discovery glob must also satisfy the stricter
/// name matcher; a file that doesn't signals a malformed naming pattern
/// and fails the whole discovery.
///
/// # Errors
///
/// Returns `DiscoveryError::NoEnvironments` when nothing matches and
/// `allow_empty` is false, and `PatternError::UnresolvableName` when a
/// glob-matched file yields no name.
pub fn discover(config: &Config, allow_empty: bool) -> Result<Vec<Environment>> {
    let pattern = config.pattern();
    let matcher = pattern.matcher(&config.cwd)?;
    let glob_pattern = config.cwd.join(pattern.to_glob());
    let template = config.template_path();

    debug!(glob = %glob_pattern.display(), "discovering environments");

    let mut environments = Vec::new();
    for entry in glob::glob(&glob_pattern.display().to_string()).map_err(DiscoveryError::BadGlob)? {
        let path = entry.map_err(DiscoveryError::Walk)?;
        if !path.is_file() || path == template {
            continue;
        }

        let name = matcher
            .name_of(&path)
            .ok_or_else(|| PatternError::UnresolvableName(path.display().to_string()))?;
        let relative = path
            .strip_prefix(&config.cwd)
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| path.clone());

        environments.push(Environment {
            name,
            path,
            relative,
        });
    }

    if !allow_empty && environments.is_empty() {
        return Err(DiscoveryError::NoEnvironments {
            pattern: config.environments.clone(),
        }
        .into());
    }

    debug!(count = environments.len(), "environments discovered");
    Ok(environments)
}

/// Validate a new environment name: filename-safe and unique.
///
/// # Errors
///
/// Returns `ValidationError` when the name is malformed or collides with
/// an existing environment.
pub fn validate_name(config: &Config, name: &str) -> Result<()> {
    if !is_valid_name(name) {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
            pattern: NAME_PATTERN,
        }
        .into());
    }

    let existing: Vec<String> = discover(config, true)?
        .into_iter()
        .map(|env| env.name)
        .collect();
    if existing.iter().any(|n| n == name) {
        return Err(ValidationError::DuplicateName {
            name: name.to_string(),
            existing: existing.join(", "),
        }
        .into());
    }

    Ok(())
}

/// Read the template file, falling back to the built-in default.
pub fn read_template(config: &Config) -> Result<String> {
    let path = config.template_path();
    if path.exists() {
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(DEFAULT_TEMPLATE.to_string())
    }
}

/// Whether a template file exists on disk.
pub fn template_exists(config: &Config) -> bool {
    config.template_path().exists()
}

/// Create a new environment file from the template.
///
/// Validates the name, renders the naming pattern, and writes the
/// template content with the placeholder substituted.
pub fn create(config: &Config, name: &str) -> Result<PathBuf> {
    validate_name(config, name)?;

    let path = config.cwd.join(config.pattern().render(name)?);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = read_template(config)?.replace(PLACEHOLDER, name);
    std::fs::write(&path, content)?;

    debug!(path = %path.display(), "environment created");
    Ok(path)
}
