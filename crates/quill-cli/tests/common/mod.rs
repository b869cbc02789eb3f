#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// An isolated CLI environment: its own credential file and data dirs.
pub struct TestEnv {
    pub home: tempfile::TempDir,
    pub api_base: String,
}

impl TestEnv {
    pub fn new(api_base: &str) -> Self {
        Self {
            home: tempfile::TempDir::new().expect("Failed to create temp dir"),
            api_base: api_base.to_string(),
        }
    }

    /// Path of the credential file used by this environment.
    pub fn store_path(&self) -> PathBuf {
        self.home.path().join("credentials.json")
    }

    /// Write a credential file as if a previous login had happened.
    pub fn seed_credentials(&self, access: &str, refresh: &str, username: &str) {
        let json = serde_json::json!({
            "access": access,
            "refresh": refresh,
            "username": username,
        });
        std::fs::write(self.store_path(), json.to_string()).expect("Failed to seed credentials");
    }

    /// Read back the credential file.
    pub fn stored_credentials(&self) -> serde_json::Value {
        let bytes = std::fs::read(self.store_path()).expect("Failed to read credentials");
        serde_json::from_slice(&bytes).expect("Credential file is not JSON")
    }
}

/// Run the CLI binary with arguments inside `env`.
pub fn run_cli(env: &TestEnv, args: &[&str]) -> Output {
    command(env.home.path(), &env.api_base, &env.store_path())
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

/// Run the CLI from async tests without blocking the mock server.
pub async fn run_cli_async(env: &TestEnv, args: &[&str]) -> Output {
    let mut cmd = command(env.home.path(), &env.api_base, &env.store_path());
    cmd.args(args);
    tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
        .await
        .expect("CLI task panicked")
}

/// Assert success and return stdout.
pub fn expect_success(args: &[&str], output: Output) -> String {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Assert failure and return stderr.
pub fn expect_failure(args: &[&str], output: Output) -> String {
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn command(home: &Path, api_base: &str, store: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_quill"));
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("QUILL_API_BASE", api_base);
    cmd.env("QUILL_STORE", store);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("QUILL_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("QUILL_TIMEOUT");
    cmd
}
