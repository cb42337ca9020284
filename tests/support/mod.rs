//! Test support utilities for envlock integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

/// A `.envlock.toml` with encryption enabled, for fabricated-state tests.
pub const ENCRYPTED_CONFIG: &str = "encrypt = true\n";

/// The `.gitattributes` line provisioning writes for the default pattern.
pub const ATTRIBUTE_LINE: &str = "env/.env.* filter=git-crypt diff=git-crypt";

/// Test environment with an isolated temp project directory.
///
/// No process-global state is mutated; child processes use
/// `.current_dir()` so tests can run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Create a test environment initialized without encryption.
    pub fn init_no_encrypt() -> Self {
        let t = Self::new();
        let output = t
            .cmd()
            .args(["init", "--yes", "--no-encrypt"])
            .output()
            .expect("failed to run envlock init");
        assert!(
            output.status.success(),
            "failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create an envlock command rooted at the test project directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("envlock").expect("failed to find envlock binary");
        cmd.current_dir(self.dir.path());
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Absolute path under the test project directory.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file under the project directory, creating parents.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Read a file under the project directory.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Write `.envlock.toml` directly.
    pub fn write_config(&self, contents: &str) {
        self.write(".envlock.toml", contents);
    }

    /// Fabricate the on-disk evidence of a provisioned-but-locked
    /// repository: attribute and ignore lines present, no key material.
    pub fn fabricate_locked(&self) {
        self.write(".gitattributes", &format!("{}\n", ATTRIBUTE_LINE));
        self.write(".gitignore", ".env\n!env/.env.*\n");
    }

    /// Fabricate a fully provisioned repository with the given raw key.
    pub fn fabricate_ready(&self, key_bytes: &[u8]) {
        self.fabricate_locked();
        let key_file = self.path(".git/git-crypt/keys/envlock");
        std::fs::create_dir_all(key_file.parent().unwrap()).unwrap();
        std::fs::write(key_file, key_bytes).unwrap();
    }

    /// Shortcut for `envlock new -e <name>`.
    pub fn new_env(&self, name: &str) -> Output {
        self.cmd()
            .args(["new", "-e", name])
            .output()
            .expect("failed to run envlock new")
    }

    /// Shortcut for installing an environment.
    pub fn install(&self, name: &str) -> Output {
        self.cmd()
            .args(["-e", name])
            .output()
            .expect("failed to run envlock")
    }
}

/// Assert the command succeeded, printing stderr on failure.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Assert the command failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "command unexpectedly succeeded: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

/// The command's stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// The command's stderr as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
