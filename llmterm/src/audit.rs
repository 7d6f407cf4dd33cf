// ABOUTME: appends one json line per command decision to an optional audit log.
// ABOUTME: records what was proposed and what happened, with command output reduced to byte counts.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Blocked { pattern: String },
    TokenizeFailed { error: String },
    Declined,
    Executed {
        exit_code: Option<i32>,
        stdout_bytes: usize,
        stderr_bytes: usize,
    },
    Faulted { error: String },
}

#[derive(Debug, serde::Serialize)]
struct AuditRecord<'a> {
    ts_unix_ms: u64,
    request: &'a str,
    command: &'a str,
    #[serde(flatten)]
    outcome: &'a CommandOutcome,
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, request: &str, command: &str, outcome: &CommandOutcome) -> anyhow::Result<()> {
        let ts_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let record = AuditRecord {
            ts_unix_ms,
            request,
            command,
            outcome,
        };

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("open audit log at {}", self.path.display()))?;

        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
