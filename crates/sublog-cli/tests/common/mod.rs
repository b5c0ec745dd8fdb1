#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;
use url::Url;

/// An isolated HOME with a local ledger directory.
pub struct TestEnv {
    _dir: TempDir,
    pub home: PathBuf,
    pub ledger: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let ledger = dir.path().join("ledger");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(&ledger).unwrap();
        Self {
            _dir: dir,
            home,
            ledger,
        }
    }

    /// `file://` URL of the ledger directory.
    pub fn api_url(&self) -> String {
        Url::from_directory_path(&self.ledger)
            .expect("Failed to convert path to file URL")
            .to_string()
    }

    /// A logged-in environment for `owner`.
    pub fn logged_in(owner: &str) -> Self {
        let env = Self::new();
        let api = env.api_url();
        env.run_success(&["login", "--api", &api, "--owner", owner]);
        env
    }

    pub fn session_path(&self) -> PathBuf {
        self.home.join("data").join("sublog").join("session.json")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sublog"));
        cmd.args(args);
        cmd.env("HOME", &self.home);
        cmd.env("XDG_DATA_HOME", self.home.join("data"));
        cmd.env("XDG_CONFIG_HOME", self.home.join("config"));
        cmd.env("NO_COLOR", "1");
        for key in ["SUBLOG_TOKEN", "SUBLOG_API", "SUBLOG_CURRENCY", "SUBLOG_REPO", "RUST_LOG"] {
            cmd.env_remove(key);
        }
        cmd
    }

    /// Run the CLI with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute CLI")
    }

    /// Run the CLI with extra environment variables.
    pub fn run_with_env(&self, args: &[&str], vars: &[(&str, &str)]) -> Output {
        let mut cmd = self.command(args);
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to execute CLI")
    }

    /// Run the CLI feeding `input` on stdin.
    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn CLI");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        child.wait_with_output().expect("Failed to wait for CLI")
    }

    /// Run the CLI and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        assert_success(args, self.run(args))
    }

    /// Run the CLI, expect success, and parse stdout as JSON.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Invalid JSON from {:?}: {}\n{}", args, e, stdout))
    }

    pub fn ledger_file(&self, owner: &str) -> PathBuf {
        ledger_file(&self.ledger, owner)
    }
}

pub fn ledger_file(root: &Path, owner: &str) -> PathBuf {
    root.join("repos")
        .join(owner)
        .join("subscription-ledger")
        .join("files")
        .join("subscriptions.json")
}

pub fn assert_success(args: &[&str], output: Output) -> String {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
