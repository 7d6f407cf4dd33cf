// ABOUTME: provides the llmterm cli: an interactive assistant that proposes and runs shell commands.
// ABOUTME: also evaluates saved model replies offline and prints the verdict as json.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use llm_term_common::{evaluate, Language, DEFAULT_HISTORY_TURNS};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use llmterm::backend::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SEC, DEFAULT_URL};
use llmterm::{
    facts, AuditLog, Mediator, MediatorConfig, OllamaBackend, OllamaConfig, ProcessExecutor, TerminalConsole,
};

#[derive(Debug, Parser)]
#[command(name = "llmterm", version, about = "Local model assistant that proposes shell commands")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    chat: ChatArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify a model reply without contacting the model or running anything.
    Classify {
        #[arg(long)]
        file: Option<String>,

        #[arg(long)]
        text: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LanguageArg {
    Pt,
    En,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Pt => Language::Pt,
            LanguageArg::En => Language::En,
        }
    }
}

#[derive(Debug, clap::Args)]
struct ChatArgs {
    #[arg(long, env = "LLMTERM_URL", default_value = DEFAULT_URL)]
    url: String,

    #[arg(long, env = "LLMTERM_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SEC)]
    timeout_sec: u64,

    /// Kill commands that run longer than this; unbounded when unset.
    #[arg(long)]
    exec_timeout_sec: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_HISTORY_TURNS)]
    history_turns: usize,

    #[arg(long, value_enum, default_value_t = LanguageArg::Pt)]
    language: LanguageArg,

    #[arg(long, env = "LLMTERM_AUDIT_PATH")]
    audit_path: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Some(Command::Classify { file, text }) => {
            let input = read_input(file.as_deref(), text.as_deref()).await?;
            let verdict = evaluate(input.trim_end_matches('\n'));
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        None => chat(args.chat).await?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LLMTERM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn chat(args: ChatArgs) -> anyhow::Result<()> {
    let backend = OllamaBackend::new(OllamaConfig {
        url: args.url,
        model: args.model,
        temperature: args.temperature,
        timeout: Duration::from_secs(args.timeout_sec),
    })
    .context("build http client")?;
    let executor = ProcessExecutor::new(args.exec_timeout_sec.map(Duration::from_secs));
    let console = TerminalConsole::new().context("install interrupt handler")?;

    let config = MediatorConfig {
        language: args.language.into(),
        history_turns: args.history_turns,
    };
    let mut mediator = Mediator::new(backend, executor, console, facts::gather(), config);
    if let Some(path) = args.audit_path {
        mediator = mediator.with_audit(AuditLog::new(path));
    }

    mediator.run().await;
    Ok(())
}

async fn read_input(file: Option<&str>, text: Option<&str>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }

    if let Some(file) = file {
        return tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("read {file}"));
    }

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}
