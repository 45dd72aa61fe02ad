//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scratch directory that doubles as the working directory for `sfconn`.
pub struct Sandbox {
    pub dir: TempDir,
    sfdx_command: Option<String>,
}

/// Captured result of one `sfconn` run.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    /// Lines of stderr emitted at ERROR level.
    pub fn error_lines(&self) -> Vec<&str> {
        self.stderr
            .lines()
            .filter(|line| line.contains("ERROR"))
            .collect()
    }
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        RunResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Sandbox {
    pub fn new() -> anyhow::Result<Self> {
        let dir = tempfile::Builder::new().prefix("sfconn-it-").tempdir()?;
        Ok(Sandbox {
            dir,
            sfdx_command: None,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Install a fake `sfdx` that prints `json` and records its arguments.
    pub fn with_fake_sfdx(mut self, json: &str) -> anyhow::Result<Self> {
        let script = self.path().join("fake-sfdx.sh");
        let args_log = self.args_log_path();
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > {}\ncat <<'EOF'\n{json}\nEOF\n",
                shell_words::quote(&args_log.display().to_string())
            ),
        )?;
        self.sfdx_command = Some(format!(
            "sh {}",
            shell_words::quote(&script.display().to_string())
        ));
        Ok(self)
    }

    /// Point `sfdx` at a command that does not exist.
    pub fn with_missing_sfdx(mut self) -> Self {
        self.sfdx_command = Some("sfconn-missing-tool-for-tests".to_string());
        self
    }

    pub fn args_log_path(&self) -> PathBuf {
        self.path().join("sfdx-args.txt")
    }

    /// Run the `sfconn` binary inside the sandbox.
    pub fn run(&self, args: &[&str]) -> anyhow::Result<RunResult> {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> anyhow::Result<RunResult> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_sfconn"));
        command
            .args(args)
            .current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("SFCONN_TRACE_LEVEL")
            .env("NO_COLOR", "1");
        match &self.sfdx_command {
            Some(sfdx) => command.env("SFCONN_SFDX_COMMAND", sfdx),
            None => command.env_remove("SFCONN_SFDX_COMMAND"),
        };
        for (key, value) in env {
            command.env(key, value);
        }
        Ok(command.output()?.into())
    }
}
