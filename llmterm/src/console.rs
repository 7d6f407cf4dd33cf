// ABOUTME: line-oriented terminal surface for reading requests and confirmations and printing results.
// ABOUTME: an interrupt while waiting for a line is reported instead of killing the process.

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Eof,
    Interrupted,
}

#[async_trait]
pub trait Console: Send {
    /// Shows `prompt` without a trailing newline and waits for one line.
    async fn read_line(&mut self, prompt: &str) -> Input;

    fn show(&mut self, text: &str);
}

pub struct TerminalConsole {
    lines: Lines<BufReader<Stdin>>,
    interrupts: Signal,
}

impl TerminalConsole {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            interrupts: signal(SignalKind::interrupt())?,
        })
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn read_line(&mut self, prompt: &str) -> Input {
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{prompt}");
        let _ = stdout.flush();

        tokio::select! {
            line = self.lines.next_line() => match line {
                Ok(Some(line)) => Input::Line(line),
                Ok(None) => Input::Eof,
                Err(err) => {
                    warn!(error = %err, "failed to read from stdin");
                    Input::Eof
                }
            },
            _ = self.interrupts.recv() => Input::Interrupted,
        }
    }

    fn show(&mut self, text: &str) {
        let mut stdout = std::io::stdout();
        let _ = writeln!(stdout, "{text}");
        let _ = stdout.flush();
    }
}
