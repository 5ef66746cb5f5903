//! Runs the `claude` CLI in print mode as a bounded child process.
//!
//! The prompt goes to the child's stdin; stdout and stderr are captured in
//! full. A child that outlives the timeout is killed and reaped before
//! [`ClaudeCli::run`] returns.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::ChatError;

pub const DEFAULT_PROGRAM: &str = "claude";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const PRINT_FLAG: &str = "--print";
const SYSTEM_PROMPT_FLAG: &str = "--append-system-prompt";

/// Everything captured from one finished invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone)]
pub struct ClaudeCli {
    program: PathBuf,
    timeout: Duration,
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
    }
}

impl ClaudeCli {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arguments for one invocation. An empty system prompt adds nothing.
    pub fn args(system: Option<&str>) -> Vec<String> {
        let mut args = vec![PRINT_FLAG.to_string()];
        if let Some(system) = system.filter(|s| !s.is_empty()) {
            args.push(SYSTEM_PROMPT_FLAG.to_string());
            args.push(system.to_string());
        }
        args
    }

    pub async fn run(&self, prompt: &str, system: Option<&str>) -> Result<CliOutput, ChatError> {
        let mut child = Command::new(&self.program)
            .args(Self::args(system))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        debug!(
            program = %self.program.display(),
            pid = child.id(),
            "claude CLI spawned"
        );

        let waited = timeout(self.timeout, communicate(&mut child, prompt.as_bytes())).await;

        match waited {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => {
                reap(&mut child).await;
                Err(err.into())
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    "claude CLI timed out, killing child"
                );
                reap(&mut child).await;
                Err(ChatError::Timeout)
            }
        }
    }
}

/// Feeds stdin, drains both output pipes and waits for exit, all at once so
/// neither side can stall on a full pipe buffer.
async fn communicate(child: &mut Child, input: &[u8]) -> io::Result<CliOutput> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let feed = async move {
        if let Some(mut stdin) = stdin {
            // A child may exit without reading its input.
            match stdin.write_all(input).await {
                Err(err) if err.kind() != io::ErrorKind::BrokenPipe => return Err(err),
                _ => {}
            }
        }
        Ok(())
    };

    let ((), stdout, stderr, status) =
        tokio::try_join!(feed, read_pipe(stdout), read_pipe(stderr), child.wait())?;

    Ok(CliOutput {
        status: exit_code(status),
        stdout,
        stderr,
    })
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<String> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn reap(child: &mut Child) {
    // Errors here mean the child is already gone.
    if let Err(err) = child.kill().await {
        debug!(error = %err, "claude CLI kill failed");
    }
}

fn spawn_error(err: io::Error) -> ChatError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => ChatError::BinaryNotFound,
        _ => ChatError::Internal(err.to_string()),
    }
}

/// Exit code, or the negated signal number for a signalled child.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    signal_code(status).unwrap_or(-1)
}

#[cfg(unix)]
fn signal_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| -sig)
}

#[cfg(not(unix))]
fn signal_code(_status: ExitStatus) -> Option<i32> {
    None
}
