//! Subprocess client for limactl.
//!
//! Every operation spawns one `limactl` invocation and waits for it
//! to finish; there is no long-lived connection and no state on this
//! side beyond the binary path.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{LimaError, Result};
use crate::vm::VmRecord;

/// Binary name used when no explicit path is configured.
pub const DEFAULT_PROGRAM: &str = "limactl";

/// Client that shells out to the limactl binary.
#[derive(Debug, Clone)]
pub struct LimaClient {
    program: PathBuf,
}

impl LimaClient {
    /// Create a client that resolves `limactl` via `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }

    /// Create a client using an explicit limactl binary.
    #[must_use]
    pub fn with_program(path: impl AsRef<Path>) -> Self {
        Self {
            program: path.as_ref().to_path_buf(),
        }
    }

    /// The limactl binary this client invokes.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// List all instances.
    ///
    /// Runs `limactl list --format json` and parses the JSONL output.
    /// A malformed line fails the whole call; empty output is an
    /// empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if limactl cannot be launched, exits
    /// non-zero, or prints a line that is not a valid VM record.
    pub async fn list(&self) -> Result<Vec<VmRecord>> {
        let output = Command::new(&self.program)
            .args(["list", "--format", "json"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LimaError::NotInstalled {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(command_failed("list --format json", &output.stderr));
        }

        let vms = parse_vm_list(&String::from_utf8_lossy(&output.stdout))?;
        debug!(count = vms.len(), "listed instances");
        Ok(vms)
    }

    /// Start a stopped instance.
    ///
    /// # Errors
    ///
    /// Returns an error if limactl cannot be launched or exits non-zero.
    pub async fn start(&self, name: &str) -> Result<()> {
        self.run_verb("start", name).await
    }

    /// Stop a running instance.
    ///
    /// # Errors
    ///
    /// Returns an error if limactl cannot be launched or exits non-zero.
    pub async fn stop(&self, name: &str) -> Result<()> {
        self.run_verb("stop", name).await
    }

    /// Delete an instance. Destructive; callers are expected to have
    /// confirmed with the user first.
    ///
    /// # Errors
    ///
    /// Returns an error if limactl cannot be launched or exits non-zero.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.run_verb("delete", name).await
    }

    /// Build the interactive `limactl shell <name>` command.
    ///
    /// The command is returned unspawned with inherited stdio; the
    /// caller hands the terminal to it and blocks until it exits.
    #[must_use]
    pub fn shell_command(&self, name: &str) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(["shell", name]);
        cmd
    }

    async fn run_verb(&self, verb: &str, name: &str) -> Result<()> {
        debug!(verb, name, "running limactl");
        let output = Command::new(&self.program)
            .args([verb, name])
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LimaError::NotInstalled {
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(command_failed(&format!("{verb} {name}"), &output.stderr))
        }
    }
}

impl Default for LimaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn command_failed(command: &str, stderr: &[u8]) -> LimaError {
    LimaError::CommandFailed {
        command: command.to_string(),
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    }
}

/// Parse newline-delimited `limactl list --format json` output.
///
/// Records come back in input order. Blank lines are skipped; any
/// other malformed line fails the whole call with no partial result.
///
/// # Errors
///
/// Returns [`LimaError::Parse`] naming the first offending line.
pub fn parse_vm_list(output: &str) -> Result<Vec<VmRecord>> {
    let mut vms = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let vm = serde_json::from_str(line).map_err(|source| LimaError::Parse {
            line: line.to_string(),
            source,
        })?;
        vms.push(vm);
    }
    Ok(vms)
}
