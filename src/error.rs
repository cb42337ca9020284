//! Error types for envlock operations.
//!
//! Each subsystem has its own error enum; the top-level [`Error`] wraps
//! them so commands can return a single `Result<T>`.

use thiserror::Error;

use crate::core::lifecycle::RepoStatus;

/// Top-level error type returned by every command.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Malformed naming pattern.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("naming pattern \"{0}\" does not contain the [name] placeholder")]
    MissingPlaceholder(String),

    #[error("naming pattern \"{0}\" contains the [name] placeholder more than once")]
    DuplicatePlaceholder(String),

    #[error("could not resolve environment name for file: \"{0}\"")]
    UnresolvableName(String),

    #[error("invalid matcher built from naming pattern: {0}")]
    BadMatcher(#[from] regex::Error),
}

/// Environment discovery failures.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("no environment found at \"{pattern}\"")]
    NoEnvironments { pattern: String },

    #[error("invalid discovery glob: {0}")]
    BadGlob(#[from] glob::PatternError),

    #[error("failed reading discovered path: {0}")]
    Walk(#[from] glob::GlobError),
}

/// User-supplied input failed validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("environment name must match {pattern}: \"{name}\"")]
    InvalidName { name: String, pattern: &'static str },

    #[error("environment \"{name}\" already exists (existing: {existing})")]
    DuplicateName { name: String, existing: String },

    #[error("key is not valid base64: {reason}")]
    InvalidKeyEncoding { reason: String },

    #[error("invalid target path \"{0}\": must not contain wildcards")]
    UnsafeTarget(String),
}

/// The repository's lifecycle status forbids the requested operation.
#[derive(Error, Debug)]
#[error("repository is {status}: {remedy}")]
pub struct PreconditionError {
    pub status: RepoStatus,
    pub remedy: String,
}

/// git-crypt subprocess failures.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("git-crypt not found on PATH; see README.md for install instructions")]
    NotInstalled,

    #[error("git-crypt {operation} failed: {stderr}")]
    Failed { operation: String, stderr: String },

    #[error("failed to spawn git-crypt: {0}")]
    Spawn(std::io::Error),
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: run `envlock init` first")]
    NotInitialized,

    #[error("failed to read config file: {0}")]
    ReadFile(std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
