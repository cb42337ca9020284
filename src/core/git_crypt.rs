//! git-crypt subprocess wrapper.
//!
//! All cryptography is delegated to the `git-crypt` binary; this module
//! only shells out and interprets exit status. Exit code 0 is success;
//! a non-zero exit whose stderr matches the known "already initialized"
//! message is treated as success for `init` only.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{Result, ToolError};

/// Key name registered with git-crypt for this tool.
pub const KEY_NAME: &str = "envlock";

/// Check whether git-crypt is installed and on PATH.
pub fn is_available() -> bool {
    which::which("git-crypt").is_ok()
}

/// The path where git-crypt keeps the named key inside `.git`.
///
/// `git-crypt init` creates this file and `git-crypt lock` removes it, so
/// its existence doubles as the key-material evidence for status checks.
pub fn key_file(cwd: &Path) -> PathBuf {
    cwd.join(".git").join("git-crypt").join("keys").join(KEY_NAME)
}

/// The one place the brittle stderr sniff lives: git-crypt reports a
/// repeated `init` with this wording.
fn is_already_initialized(stderr: &str) -> bool {
    stderr.contains("already been initialized")
}

fn invoke(cwd: &Path, operation: &str, args: &[&str]) -> Result<Output> {
    if !is_available() {
        return Err(ToolError::NotInstalled.into());
    }

    debug!(operation, ?args, "invoking git-crypt");
    Command::new("git-crypt")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| ToolError::Spawn(e).into())
}

fn check(operation: &str, output: Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(ToolError::Failed {
        operation: operation.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
    .into())
}

/// Initialize git-crypt with the envlock key name.
///
/// A repository that is already initialized is not an error.
pub fn init(cwd: &Path) -> Result<()> {
    let output = invoke(cwd, "init", &["init", "--key-name", KEY_NAME])?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_already_initialized(&stderr) {
            debug!("git-crypt already initialized");
            return Ok(());
        }
    }
    check("init", output)
}

/// Export the named key's raw bytes to `path`.
pub fn export_key(cwd: &Path, path: &Path) -> Result<()> {
    let output = invoke(
        cwd,
        "export-key",
        &[
            "export-key",
            "--key-name",
            KEY_NAME,
            &path.display().to_string(),
        ],
    )?;
    check("export-key", output)
}

/// Unlock the repository with the raw key file at `path`.
pub fn unlock(cwd: &Path, path: &Path) -> Result<()> {
    let output = invoke(cwd, "unlock", &["unlock", &path.display().to_string()])?;
    check("unlock", output)
}

/// Lock the repository, re-encrypting tracked files in the working tree.
pub fn lock(cwd: &Path) -> Result<()> {
    let output = invoke(cwd, "lock", &["lock", "--key-name", KEY_NAME])?;
    check("lock", output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_initialized_predicate() {
        assert!(is_already_initialized(
            "Error: this repository has already been initialized with git-crypt."
        ));
        assert!(!is_already_initialized("Error: failed to stat file"));
        assert!(!is_already_initialized(""));
    }

    #[test]
    fn test_predicate_rejects_other_failures_mentioning_init() {
        // A genuine failure must not be swallowed just because its text
        // happens to mention both words.
        assert!(!is_already_initialized(
            "initialization failed: lock file already exists"
        ));
    }

    #[test]
    fn test_key_file_location() {
        let path = key_file(Path::new("/repo"));
        assert_eq!(path, PathBuf::from("/repo/.git/git-crypt/keys/envlock"));
    }
}
