//! Encryption lifecycle state machine.
//!
//! Repository status is derived, never stored: every query re-evaluates
//! the provisioning steps against the filesystem, because git operations
//! and manual edits can change state between invocations.

use std::fmt;

use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::steps::{self, StepId};
use crate::core::{git_crypt, keys};
use crate::error::{PreconditionError, Result};

/// Encryption setup completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoStatus {
    /// No provisioning evidence.
    Empty,
    /// Attribute and ignore evidence present but no usable key: the
    /// repository was provisioned then locked, or freshly cloned without
    /// the key.
    Locked,
    /// All steps done.
    Ready,
}

impl fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoStatus::Empty => write!(f, "empty"),
            RepoStatus::Locked => write!(f, "locked"),
            RepoStatus::Ready => write!(f, "ready"),
        }
    }
}

/// Derive the current repository status from step predicates.
///
/// The check order guarantees "some provisioning evidence but no usable
/// key" always reads as locked, never as a partial empty.
pub fn status(config: &Config) -> Result<RepoStatus> {
    let all_done = {
        let mut done = true;
        for step in steps::SEQUENCE {
            done = done && step.done(config)?;
        }
        done
    };
    if all_done {
        return Ok(RepoStatus::Ready);
    }

    if StepId::AttributeFilter.done(config)? && StepId::IgnoreList.done(config)? {
        return Ok(RepoStatus::Locked);
    }

    Ok(RepoStatus::Empty)
}

/// Raise the mapped error when the current status is forbidden.
///
/// This is the sole gate used by every command: each entry pairs a
/// disallowed status with the remedy to report.
pub fn guard(config: &Config, forbidden: &[(RepoStatus, &str)]) -> Result<RepoStatus> {
    let current = status(config)?;
    debug!(status = %current, "lifecycle status");

    if let Some((_, remedy)) = forbidden.iter().find(|(s, _)| *s == current) {
        return Err(PreconditionError {
            status: current,
            remedy: remedy.to_string(),
        }
        .into());
    }
    Ok(current)
}

/// Run the provisioning step sequence. Safe to call repeatedly.
pub fn configure(config: &Config) -> Result<()> {
    steps::drive(config)
}

/// Unlock the repository with a base64-encoded key.
///
/// The key is validated before any decode attempt, decoded to a temporary
/// file for the git-crypt invocation, and the temporary material is
/// discarded afterwards whether or not the unlock succeeded.
pub fn unlock(config: &Config, encoded_key: &str) -> Result<()> {
    let bytes = keys::decode_key(encoded_key)?;

    let temp = config.cwd.join(".git").join("envlock-unlock.key");
    if let Some(parent) = temp.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&temp, bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600))?;
    }

    let result = git_crypt::unlock(&config.cwd, &temp);
    let _ = std::fs::remove_file(&temp);
    result?;

    info!("repository unlocked");
    Ok(())
}

/// Lock the repository, returning the base64 export of the key.
///
/// The key is exported before locking: locking removes the in-tree key
/// material, so this is the caller's last chance to read it.
pub fn lock(config: &Config) -> Result<String> {
    let encoded = export_key(config)?;
    git_crypt::lock(&config.cwd)?;

    info!("repository locked");
    Ok(encoded)
}

/// Read the persisted key material and base64-encode it for transport.
pub fn export_key(config: &Config) -> Result<String> {
    let key_file = git_crypt::key_file(&config.cwd);
    if !key_file.exists() {
        let current = status(config)?;
        return Err(PreconditionError {
            status: current,
            remedy: "no key material present; run `envlock unlock` first".to_string(),
        }
        .into());
    }

    let bytes = std::fs::read(key_file)?;
    Ok(keys::encode_key(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn setup_ready() -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::new(tmp.path());
        // A supplied key lets configure() provision without git-crypt.
        config.key = Some(keys::encode_key(b"test-key-material"));
        configure(&config).unwrap();
        config.key = None;
        (tmp, config)
    }

    #[test]
    fn test_status_empty_without_evidence() {
        let tmp = TempDir::new().unwrap();
        let config = Config::new(tmp.path());
        assert_eq!(status(&config).unwrap(), RepoStatus::Empty);
    }

    #[test]
    fn test_status_ready_after_configure() {
        let (_tmp, config) = setup_ready();
        assert_eq!(status(&config).unwrap(), RepoStatus::Ready);
    }

    #[test]
    fn test_status_locked_without_key_material() {
        let (_tmp, config) = setup_ready();

        std::fs::remove_file(git_crypt::key_file(&config.cwd)).unwrap();
        assert_eq!(status(&config).unwrap(), RepoStatus::Locked);
    }

    #[test]
    fn test_status_back_to_empty_without_file_evidence() {
        let (tmp, config) = setup_ready();

        std::fs::remove_file(git_crypt::key_file(&config.cwd)).unwrap();
        std::fs::remove_file(tmp.path().join(".gitattributes")).unwrap();
        std::fs::remove_file(tmp.path().join(".gitignore")).unwrap();
        assert_eq!(status(&config).unwrap(), RepoStatus::Empty);
    }

    #[test]
    fn test_configure_twice_leaves_identical_content() {
        let (tmp, mut config) = setup_ready();
        config.key = Some(keys::encode_key(b"test-key-material"));

        let attributes = std::fs::read_to_string(tmp.path().join(".gitattributes")).unwrap();
        let ignore = std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap();

        configure(&config).unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(".gitattributes")).unwrap(),
            attributes
        );
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap(),
            ignore
        );
    }

    #[test]
    fn test_guard_raises_mapped_error() {
        let (_tmp, config) = setup_ready();

        let err = guard(&config, &[(RepoStatus::Ready, "already unlocked")]).unwrap_err();
        match err {
            Error::Precondition(e) => {
                assert_eq!(e.status, RepoStatus::Ready);
                assert!(e.remedy.contains("already unlocked"));
            }
            other => panic!("expected precondition error, got: {}", other),
        }
    }

    #[test]
    fn test_guard_passes_unlisted_status() {
        let (_tmp, config) = setup_ready();

        let current = guard(
            &config,
            &[(RepoStatus::Empty, "x"), (RepoStatus::Locked, "y")],
        )
        .unwrap();
        assert_eq!(current, RepoStatus::Ready);
    }

    #[test]
    fn test_unlock_rejects_malformed_key_before_tool_invocation() {
        let (_tmp, config) = setup_ready();

        let err = unlock(&config, "not base64!!").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_export_key_round_trips_raw_bytes() {
        let (_tmp, config) = setup_ready();

        let encoded = export_key(&config).unwrap();
        assert_eq!(keys::decode_key(&encoded).unwrap(), b"test-key-material");
    }

    #[test]
    fn test_export_key_fails_without_key_material() {
        let (_tmp, config) = setup_ready();
        std::fs::remove_file(git_crypt::key_file(&config.cwd)).unwrap();

        assert!(matches!(
            export_key(&config).unwrap_err(),
            Error::Precondition(_)
        ));
    }
}
