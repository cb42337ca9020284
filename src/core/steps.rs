//! Idempotent provisioning steps.
//!
//! Each step is one unit of "make this repository capable of encrypted
//! storage" with a `done` predicate and a `run` action. The sequence is a
//! fixed ordered list; later steps assume earlier ones succeeded, so the
//! driver walks it strictly in order on every invocation and never skips
//! ahead.

use std::path::Path;

use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::{git_crypt, keys};
use crate::error::Result;

/// Provisioning steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    /// Ensure key material exists locally.
    KeyMaterial,
    /// Bind the environments glob to the git-crypt filter in `.gitattributes`.
    AttributeFilter,
    /// Ignore the install target (and un-ignore tracked environment files).
    IgnoreList,
}

/// The fixed step sequence. Ordering is a correctness invariant.
pub const SEQUENCE: [StepId; 3] = [
    StepId::KeyMaterial,
    StepId::AttributeFilter,
    StepId::IgnoreList,
];

/// The `.gitattributes` line binding environment files to git-crypt.
pub fn attribute_line(config: &Config) -> String {
    format!(
        "{} filter=git-crypt diff=git-crypt",
        config.pattern().to_glob()
    )
}

/// The `.gitignore` lines: always ignore the install target; when
/// encrypting, explicitly un-ignore the environment files so they stay
/// tracked.
pub fn ignore_lines(config: &Config) -> Vec<String> {
    let mut lines = vec![config.target.clone()];
    if config.encrypt {
        lines.push(format!("!{}", config.pattern().to_glob()));
    }
    lines
}

fn has_line(path: &Path, line: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().any(|l| l.trim() == line))
}

/// Append any of `lines` not already present in the file.
///
/// Existing content is never rewritten or removed; a file that already
/// contains part of the expected content only gets the missing lines.
fn ensure_lines(path: &Path, lines: &[String]) -> Result<()> {
    let existing = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut updated = existing.clone();
    for line in lines {
        if !existing.lines().any(|l| l.trim() == line.as_str()) {
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(line);
            updated.push('\n');
        }
    }

    if updated != existing {
        std::fs::write(path, updated)?;
    }

    Ok(())
}

impl StepId {
    /// Whether this step's effect is already in place.
    ///
    /// Evaluated against the current filesystem on every call; external
    /// tooling (git operations, manual edits) can change the answer
    /// between invocations.
    pub fn done(&self, config: &Config) -> Result<bool> {
        match self {
            StepId::KeyMaterial => {
                Ok(!config.encrypt || git_crypt::key_file(&config.cwd).exists())
            }
            StepId::AttributeFilter => {
                if !config.encrypt {
                    return Ok(true);
                }
                has_line(&config.cwd.join(".gitattributes"), &attribute_line(config))
            }
            StepId::IgnoreList => {
                let path = config.cwd.join(".gitignore");
                for line in ignore_lines(config) {
                    if !has_line(&path, &line)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Apply this step. Safe to call when `done` already holds and
    /// tolerant of partially applied prior state.
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            StepId::KeyMaterial => {
                if !config.encrypt {
                    return Ok(());
                }
                let key_file = git_crypt::key_file(&config.cwd);

                if let Some(encoded) = &config.key {
                    // An externally supplied key takes precedence over
                    // generating a fresh one.
                    let bytes = keys::decode_key(encoded)?;
                    if let Some(parent) = key_file.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&key_file, bytes)?;
                    info!(path = %key_file.display(), "persisted supplied key");
                    return Ok(());
                }

                git_crypt::init(&config.cwd)?;
                // A tolerated re-init may leave the named key unexported.
                if !key_file.exists() {
                    git_crypt::export_key(&config.cwd, &key_file)?;
                }
                Ok(())
            }
            StepId::AttributeFilter => {
                if !config.encrypt {
                    return Ok(());
                }
                ensure_lines(&config.cwd.join(".gitattributes"), &[attribute_line(config)])
            }
            StepId::IgnoreList => {
                ensure_lines(&config.cwd.join(".gitignore"), &ignore_lines(config))
            }
        }
    }
}

/// Run the step sequence: one linear pass, re-entrant on every invocation.
///
/// A failing step aborts the pass with no rollback; re-running resumes
/// from the first not-yet-done step.
pub fn drive(config: &Config) -> Result<()> {
    for step in SEQUENCE {
        if step.done(config)? {
            debug!(?step, "step already done");
            continue;
        }
        info!(?step, "running step");
        step.run(config)?;
    }
    Ok(())
}
