// ABOUTME: runs a confirmed argv as a child process and captures its output and exit status.
// ABOUTME: the child inherits the environment unchanged; a runtime bound is opt-in.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("missing argv[0]")]
    MissingProgram,
    #[error("command not found: {program}")]
    NotFound { program: String },
    #[error("{program} timed out after {} s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
    #[error("failed to run {program}: {source}")]
    Failed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, argv: &[String]) -> Result<ExecutionResult, ExecError>;
}

#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn run(&self, argv: &[String]) -> Result<ExecutionResult, ExecError> {
        let (program, args) = argv.split_first().ok_or(ExecError::MissingProgram)?;

        let mut cmd = Command::new(program);
        cmd.args(args).kill_on_drop(true);

        info!(argv = ?argv, "executing command");

        let output = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, cmd.output()).await {
                Ok(res) => res,
                Err(_) => {
                    return Err(ExecError::TimedOut {
                        program: program.clone(),
                        timeout,
                    })
                }
            },
            None => cmd.output().await,
        };

        let output = output.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ExecError::NotFound {
                    program: program.clone(),
                }
            } else {
                ExecError::Failed {
                    program: program.clone(),
                    source: err,
                }
            }
        })?;

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        })
    }
}
