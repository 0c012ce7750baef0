/// External tool invocation
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of one tool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Human-readable reason for a failed run: the tool's own stderr, or
    /// the exit status when it printed nothing
    pub fn failure_message(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs an external program to completion and captures its output
///
/// The probe only talks to sox and bs1770gain through this trait, so tests
/// can answer with canned output instead of spawning processes.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args`
    ///
    /// # Errors
    /// Returns an error if the program cannot be launched or does not
    /// finish in time. A non-zero exit is not an error at this level.
    async fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput>;
}

/// Spawns real processes with tokio
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for SystemRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput> {
        tracing::debug!("Running {} {:?}", program.display(), args);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("timed out after {:?}", limit),
                    )
                })??,
            None => cmd.output().await?,
        };

        Ok(ToolOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
