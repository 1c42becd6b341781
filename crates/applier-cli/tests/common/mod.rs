//! Shared E2E test helpers for `applier` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

const APPLIER_VARS: &[&str] = &[
    "APPLIER_DEBUG",
    "APPLIER_PROFILE_DIR",
    "APPLIER_EXIT_WHEN_IDLE",
    "APPLIER_INTERACTIVE",
    "RUST_LOG",
];

/// An isolated home, project and profile directory.
///
/// Keep it alive for the test's duration.
pub struct Sandbox {
    pub home: TempDir,
    pub project: TempDir,
}

impl Sandbox {
    /// Creates a sandbox with the standard profiles:
    ///
    /// | ID | Name | Default |
    /// |----|------|---------|
    /// | 1001 | Work | off |
    /// | 1002 | Night | - |
    /// | broken | (malformed) | |
    pub fn new() -> Self {
        let sandbox = Self {
            home: tempfile::tempdir().expect("create temp home"),
            project: tempfile::tempdir().expect("create temp project"),
        };
        sandbox.write_profile(
            "1001",
            "[profile]\nname = \"Work\"\nstate = \"off\"\n\n[actions]\nmute = true\n",
        );
        sandbox.write_profile("1002", "[profile]\nname = \"Night\"\n");
        sandbox.write_profile("broken", "[profile\nname = ");
        sandbox
    }

    pub fn profiles_dir(&self) -> std::path::PathBuf {
        self.project.path().join("profiles")
    }

    pub fn write_profile(&self, id: &str, content: &str) {
        let dir = self.profiles_dir();
        std::fs::create_dir_all(&dir).expect("create profiles dir");
        std::fs::write(dir.join(format!("{id}.toml")), content).expect("write profile");
    }

    pub fn write_project_config(&self, content: &str) {
        write_config(&self.project.path().join(".applier"), content);
    }

    /// Command running in the project with only the sandbox profile dir.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("applier");
        cmd.timeout(TIMEOUT_BASIC);
        for var in APPLIER_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path())
            .current_dir(self.project.path())
            .arg("--profile-dir")
            .arg(self.profiles_dir());
        cmd
    }
}

fn write_config(dir: &Path, content: &str) {
    std::fs::create_dir_all(dir).expect("create config dir");
    std::fs::write(dir.join("config.toml"), content).expect("write config");
}

/// Parses stdout into one JSON value per line.
pub fn orders(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("stdout line should be JSON"))
        .collect()
}
