#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use wiremock::MockServer;

/// API base URL of a mock server, mounted under `/api`.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Run the CLI binary with an isolated data directory and API URL.
pub fn run_cli(args: &[&str], data_dir: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_collegeconnect"));
    cmd.args(args);
    cmd.env("COLLEGECONNECT_DATA_DIR", data_dir);
    cmd.env("COLLEGECONNECT_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str], data_dir: &Path, api_url: &str) -> String {
    let output = run_cli(args, data_dir, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_failure(args: &[&str], data_dir: &Path, api_url: &str) -> String {
    let output = run_cli(args, data_dir, api_url);
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!("CLI command should have failed: {:?}\nstdout: {}", args, stdout);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Seed the data directory with a stored credential.
pub fn store_credential(data_dir: &Path, token: &str) {
    let json = serde_json::json!({ "jwtToken": token });
    fs::write(data_dir.join("credentials.json"), json.to_string()).unwrap();
}

/// Read the stored credential, if any.
pub fn stored_credential(data_dir: &Path) -> Option<String> {
    let raw = fs::read_to_string(data_dir.join("credentials.json")).ok()?;
    let json: serde_json::Value = serde_json::from_str(&raw).ok()?;
    json["jwtToken"].as_str().map(str::to_string)
}
