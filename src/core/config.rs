//! Configuration file management.
//!
//! Handles reading, writing, and defaulting `.envlock.toml` configuration
//! files. Command-line flags override file values; the resolved working
//! directory and any externally supplied key ride along on the loaded
//! config but are never persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::pattern::Pattern;
use crate::error::{ConfigError, Result};

/// Configuration file name at the repository root.
pub const CONFIG_FILE: &str = ".envlock.toml";

fn default_target() -> String {
    ".env".to_string()
}

fn default_template() -> String {
    "env/.env.template".to_string()
}

fn default_environments() -> String {
    "env/.env.[name]".to_string()
}

fn default_encrypt() -> bool {
    true
}

/// Project configuration stored in `.envlock.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Copy the environment file into place instead of symlinking.
    #[serde(default)]
    pub copy: bool,

    /// Install-target path for the selected environment file.
    #[serde(default = "default_target")]
    pub target: String,

    /// Path to the template used when creating new environments.
    #[serde(default = "default_template")]
    pub template: String,

    /// Naming pattern for environment files, containing `[name]`.
    #[serde(default = "default_environments")]
    pub environments: String,

    /// Whether environment files are encrypted at rest via git-crypt.
    #[serde(default = "default_encrypt")]
    pub encrypt: bool,

    /// Resolved repository root. Runtime-only.
    #[serde(skip)]
    pub cwd: PathBuf,

    /// Externally supplied base64-encoded key. Runtime-only.
    #[serde(skip)]
    pub key: Option<String>,
}

impl Config {
    /// A configuration with all defaults, rooted at `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            copy: false,
            target: default_target(),
            template: default_template(),
            environments: default_environments(),
            encrypt: default_encrypt(),
            cwd: cwd.into(),
            key: None,
        }
    }

    /// Path to the configuration file under `cwd`.
    pub fn config_path(cwd: &Path) -> PathBuf {
        cwd.join(CONFIG_FILE)
    }

    /// Check whether a configuration file exists under `cwd`.
    pub fn exists(cwd: &Path) -> bool {
        Self::config_path(cwd).exists()
    }

    /// Load configuration from `.envlock.toml` under `cwd`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(cwd: &Path) -> Result<Self> {
        let path = Self::config_path(cwd);
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.cwd = cwd.to_path_buf();

        debug!(pattern = %config.environments, encrypt = config.encrypt, "config loaded");
        Ok(config)
    }

    /// Load configuration if present, falling back to defaults otherwise.
    pub fn load_or_default(cwd: &Path) -> Result<Self> {
        if Self::exists(cwd) {
            Self::load(cwd)
        } else {
            Ok(Self::new(cwd))
        }
    }

    /// Save configuration to `.envlock.toml`.
    pub fn save(&self) -> Result<()> {
        debug!("saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(Self::config_path(&self.cwd), contents)?;

        Ok(())
    }

    /// The parsed naming pattern.
    pub fn pattern(&self) -> Pattern {
        Pattern::parse(&self.environments)
    }

    /// Absolute install-target path.
    pub fn target_path(&self) -> PathBuf {
        self.cwd.join(&self.target)
    }

    /// Absolute template path.
    pub fn template_path(&self) -> PathBuf {
        self.cwd.join(self.template.strip_prefix("./").unwrap_or(&self.template))
    }
}

/// Command-line overrides applied on top of the configuration file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub copy: bool,
    pub target: Option<String>,
    pub template: Option<String>,
    pub environments: Option<String>,
    pub no_encrypt: bool,
    pub key: Option<String>,
}

impl Config {
    /// Apply command-line overrides, returning the merged configuration.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if overrides.copy {
            self.copy = true;
        }
        if let Some(target) = &overrides.target {
            self.target = target.clone();
        }
        if let Some(template) = &overrides.template {
            self.template = template.clone();
        }
        if let Some(environments) = &overrides.environments {
            self.environments = environments.clone();
        }
        if overrides.no_encrypt {
            self.encrypt = false;
        }
        if overrides.key.is_some() {
            self.key = overrides.key.clone();
        }
        self
    }
}
