//! Test support utilities for pf integration tests.

#![allow(dead_code)]

pub mod assertions;

#[allow(unused_imports)]
pub use assertions::*;

use assert_cmd::Command;
use std::path::PathBuf;
use std::process::Output;
use tempfile::TempDir;

/// Test environment with an isolated store and home directory.
///
/// No process-global state is mutated; every command gets its
/// environment explicitly so tests can run in parallel.
pub struct Test {
    /// Temporary home directory
    pub home: TempDir,
    /// Temporary directory holding the store
    pub dir: TempDir,
}

impl Test {
    /// Create an empty environment with no store yet.
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { home, dir }
    }

    /// Create an environment with an initialized store.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.run(&["init"]);
        assert!(
            output.status.success(),
            "Failed to initialize store: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Store root used by [`Test::cmd`].
    pub fn store(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    /// Identity file used by [`Test::cmd`].
    pub fn identity(&self) -> PathBuf {
        self.home.path().join(".pf").join("age-key.txt")
    }

    /// A `pf` command bound to this environment's store and identity.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pf").expect("failed to find pf binary");
        cmd.env("HOME", self.home.path())
            .env("PF_STORE", self.store())
            .env("PF_IDENTITY", self.identity())
            .env("USER", "tester")
            .env("NO_COLOR", "1")
            .env_remove("PF_AUDIT")
            .env_remove("PF_LOG");
        cmd
    }

    /// Run `pf` with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd().args(args).output().expect("failed to run pf")
    }

    /// Shortcut for `pf put <key> <value>`.
    pub fn put(&self, key: &str, value: &str) -> Output {
        self.run(&["put", key, value])
    }

    /// Shortcut for `pf get <key>`.
    pub fn get(&self, key: &str) -> Output {
        self.run(&["get", key])
    }
}
