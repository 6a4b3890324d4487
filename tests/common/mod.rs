//! Common test utilities for rhasspy-supervisor integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Profile name every fixture uses
pub const PROFILE: &str = "en";

/// System and user profile directories for one test
pub struct TestProfiles {
    /// Keeps the directories alive for the duration of the test
    pub temp: TempDir,
    pub system: PathBuf,
    pub user: PathBuf,
}

impl TestProfiles {
    /// Create empty system and user profile directories
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let system = temp.path().join("system");
        let user = temp.path().join("user");
        std::fs::create_dir_all(&system).expect("Failed to create system profiles");
        std::fs::create_dir_all(&user).expect("Failed to create user profiles");
        Self { temp, system, user }
    }

    /// Write `<system>/defaults.json`
    pub fn write_defaults(&self, json: &str) {
        write(&self.system.join("defaults.json"), json);
    }

    /// Write the shipped `<system>/en/profile.json`
    pub fn write_system_profile(&self, json: &str) {
        write(&self.system.join(PROFILE).join("profile.json"), json);
    }

    /// Write the user's `<user>/en/profile.json`
    pub fn write_user_profile(&self, json: &str) {
        write(&self.user.join(PROFILE).join("profile.json"), json);
    }

    /// Path of a generated file inside the user profile directory
    pub fn output(&self, name: &str) -> PathBuf {
        self.user.join(PROFILE).join(name)
    }

    /// Read a generated file
    pub fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.output(name)).expect("Failed to read output file")
    }

    /// `rhasspy-supervisor compile` against these directories
    pub fn compile_cmd(&self) -> Command {
        let mut cmd = bin();
        cmd.env_remove("RHASSPY_PROFILE")
            .env_remove("RUST_LOG")
            .arg("compile")
            .args(["--profile", PROFILE])
            .arg("--system-profiles")
            .arg(&self.system)
            .arg("--user-profiles")
            .arg(&self.user);
        cmd
    }
}

impl Default for TestProfiles {
    fn default() -> Self {
        Self::new()
    }
}

/// The rhasspy-supervisor binary
// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn bin() -> Command {
    Command::cargo_bin("rhasspy-supervisor").expect("binary should be built")
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Split a supervisord `command=` line back into tokens
pub fn command_tokens(conf: &str, program: &str) -> Vec<String> {
    let header = format!("[program:{program}]");
    let line = conf
        .lines()
        .skip_while(|l| *l != header)
        .find(|l| l.starts_with("command="))
        .expect("program stanza with a command line");
    shell_words::split(line.trim_start_matches("command=")).expect("valid shell quoting")
}
