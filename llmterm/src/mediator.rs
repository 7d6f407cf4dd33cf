// ABOUTME: drives one conversation turn at a time from user request to displayed outcome.
// ABOUTME: model replies are classified and gated, and commands only run after explicit confirmation.

use llm_term_common::{
    build_prompt, evaluate, ConversationMemory, Decision, Grammar, Language, SystemFacts, Turn,
    DEFAULT_HISTORY_TURNS,
};
use tracing::{debug, info, warn};

use crate::audit::{AuditLog, CommandOutcome};
use crate::backend::{self, Backend, BackendError};
use crate::console::{Console, Input};
use crate::executor::{ExecutionResult, Executor};

pub const INPUT_PROMPT: &str = "\nyou> ";
pub const CONFIRM_PROMPT: &str = "Execute? [s/N]: ";

const QUIT_WORDS: &[&str] = &["sair", "exit", "quit"];
const AFFIRMATIVE: &[&str] = &["s", "sim", "y", "yes"];
const RULE: &str = "==================================================";

pub fn is_quit_command(input: &str) -> bool {
    let input = input.trim();
    QUIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    AFFIRMATIVE.iter().any(|w| answer.eq_ignore_ascii_case(w))
}

#[derive(Debug, Clone)]
pub struct MediatorConfig {
    pub language: Language,
    pub history_turns: usize,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            history_turns: DEFAULT_HISTORY_TURNS,
        }
    }
}

/// Where a single turn ended up before control returned to the input prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Idle,
    Quit,
    BackendFailed,
    Displayed,
    OutsideFormat,
    Blocked,
    TokenizeFailed,
    Cancelled,
    Executed { exit_code: Option<i32> },
    ExecFailed,
}

pub struct Mediator<B, E, C> {
    backend: B,
    executor: E,
    console: C,
    grammar: &'static Grammar,
    facts: SystemFacts,
    history_turns: usize,
    memory: ConversationMemory,
    audit: Option<AuditLog>,
}

impl<B: Backend, E: Executor, C: Console> Mediator<B, E, C> {
    pub fn new(backend: B, executor: E, console: C, facts: SystemFacts, config: MediatorConfig) -> Self {
        let grammar = config.language.grammar();
        Self {
            backend,
            executor,
            console,
            grammar,
            facts,
            history_turns: config.history_turns,
            memory: ConversationMemory::new(grammar.speakers),
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Runs turns until a quit word, end of input, or an interrupt at the input prompt.
    pub async fn run(&mut self) {
        self.console.show("Local Linux assistant ready.");
        self.console.show("Type 'sair' or 'exit' to quit.");

        loop {
            match self.console.read_line(INPUT_PROMPT).await {
                Input::Line(line) => {
                    if self.handle_input(&line).await == TurnOutcome::Quit {
                        break;
                    }
                }
                Input::Eof | Input::Interrupted => {
                    self.console.show("\nShutting down.");
                    break;
                }
            }
        }
    }

    /// Handles one line of user input.
    ///
    /// The model reply is recorded in memory before any branch runs. A backend
    /// failure records nothing beyond the user request and skips classification.
    pub async fn handle_input(&mut self, input: &str) -> TurnOutcome {
        let request = input.trim();
        if request.is_empty() {
            return TurnOutcome::Idle;
        }
        if is_quit_command(request) {
            self.console.show("Goodbye.");
            return TurnOutcome::Quit;
        }

        self.memory.append(Turn::user(request));
        let history = self.memory.recent_history(self.history_turns);
        let prompt = build_prompt(self.grammar, &self.facts, &history, request);

        let reply = self.backend.generate(&prompt).await.and_then(|raw| {
            if backend::is_error_reply(&raw) {
                Err(BackendError::ErrorReply(raw))
            } else {
                Ok(raw)
            }
        });

        let raw = match reply {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "backend request failed");
                self.console.show(&err.to_string());
                return TurnOutcome::BackendFailed;
            }
        };

        self.memory.append(Turn::model(raw.as_str()));

        let verdict = evaluate(&raw);
        debug!(
            kind = ?verdict.kind,
            label = ?verdict.label,
            fallback = verdict.fallback,
            decision = ?verdict.decision,
            "classified reply"
        );

        let payload = verdict.payload.as_deref().unwrap_or_default();
        match verdict.decision {
            Decision::Display => {
                self.console.show(payload);
                TurnOutcome::Displayed
            }
            Decision::OutsideFormat => {
                self.console.show("Response outside the expected format:");
                self.console.show(&raw);
                TurnOutcome::OutsideFormat
            }
            Decision::Blocked => {
                let pattern = verdict.blocked_by.as_deref().unwrap_or_default();
                self.block(request, payload.trim(), pattern).await
            }
            Decision::TokenizeFailed => {
                let error = verdict.error.as_deref().unwrap_or_default();
                self.reject_unparsable(request, payload.trim(), error).await
            }
            Decision::ConfirmAndExecute => {
                let argv = verdict.argv.as_deref().unwrap_or_default();
                self.confirm_and_execute(request, payload.trim(), argv).await
            }
        }
    }

    async fn block(&mut self, request: &str, command: &str, pattern: &str) -> TurnOutcome {
        warn!(command, pattern, "command blocked by denylist");
        self.console.show("Command blocked for safety:");
        self.console.show(command);
        self.console.show(&format!("(matches denylist pattern \"{pattern}\")"));
        self.record(
            request,
            command,
            CommandOutcome::Blocked {
                pattern: pattern.to_string(),
            },
        )
        .await;
        TurnOutcome::Blocked
    }

    async fn reject_unparsable(&mut self, request: &str, command: &str, error: &str) -> TurnOutcome {
        self.console.show(&format!("Could not interpret the command: {error}"));
        self.record(
            request,
            command,
            CommandOutcome::TokenizeFailed {
                error: error.to_string(),
            },
        )
        .await;
        TurnOutcome::TokenizeFailed
    }

    async fn confirm_and_execute(&mut self, request: &str, command: &str, argv: &[String]) -> TurnOutcome {
        self.console.show("\nSuggested command:");
        self.console.show(&format!("  {command}"));

        let confirmed = match self.console.read_line(CONFIRM_PROMPT).await {
            Input::Line(answer) => is_affirmative(&answer),
            Input::Eof | Input::Interrupted => false,
        };
        if !confirmed {
            self.console.show("Cancelled.");
            self.record(request, command, CommandOutcome::Declined).await;
            return TurnOutcome::Cancelled;
        }

        self.console.show(&format!("\nExecuting...\n{RULE}"));

        let outcome = match self.executor.run(argv).await {
            Ok(result) => {
                info!(command, exit_code = ?result.exit_code, "command finished");
                self.report(&result);
                self.record(
                    request,
                    command,
                    CommandOutcome::Executed {
                        exit_code: result.exit_code,
                        stdout_bytes: result.stdout.len(),
                        stderr_bytes: result.stderr.len(),
                    },
                )
                .await;
                TurnOutcome::Executed {
                    exit_code: result.exit_code,
                }
            }
            Err(err) => {
                warn!(command, error = %err, "command execution failed");
                self.console.show(&err.to_string());
                self.record(request, command, CommandOutcome::Faulted { error: err.to_string() })
                    .await;
                TurnOutcome::ExecFailed
            }
        };

        self.console.show(RULE);
        outcome
    }

    fn report(&mut self, result: &ExecutionResult) {
        if !result.stdout.is_empty() {
            self.console.show(result.stdout.trim_end());
        }
        if !result.stderr.is_empty() {
            self.console.show("\nstderr:");
            self.console.show(result.stderr.trim_end());
        }
        if !result.success() {
            match result.exit_code {
                Some(code) => self.console.show(&format!("\nexit code: {code}")),
                None => self.console.show("\nterminated by signal"),
            }
        }
    }

    async fn record(&self, request: &str, command: &str, outcome: CommandOutcome) {
        if let Some(audit) = &self.audit {
            if let Err(err) = audit.append(request, command, &outcome).await {
                warn!(path = %audit.path().display(), error = %err, "failed to write audit record");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use llm_term_common::Speaker;

    use super::*;
    use crate::executor::ExecError;

    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, BackendError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, BackendError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn replying(reply: &str) -> Self {
            Self::new(vec![Ok(reply.to_string())])
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(BackendError::Unexpected("no scripted reply".to_string())))
        }
    }

    enum Scripted {
        Output(ExecutionResult),
        NotFound,
        Unrunnable,
    }

    struct RecordingExecutor {
        outcome: Scripted,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingExecutor {
        fn returning(stdout: &str, stderr: &str, exit_code: Option<i32>) -> Self {
            Self {
                outcome: Scripted::Output(ExecutionResult {
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                    exit_code,
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn not_found() -> Self {
            Self {
                outcome: Scripted::NotFound,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn unrunnable() -> Self {
            Self {
                outcome: Scripted::Unrunnable,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Executor for RecordingExecutor {
        async fn run(&self, argv: &[String]) -> Result<ExecutionResult, ExecError> {
            self.calls.lock().unwrap().push(argv.to_vec());
            match &self.outcome {
                Scripted::Output(result) => Ok(result.clone()),
                Scripted::NotFound => Err(ExecError::NotFound {
                    program: argv[0].clone(),
                }),
                Scripted::Unrunnable => Err(ExecError::Failed {
                    program: argv[0].clone(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
                }),
            }
        }
    }

    #[derive(Default)]
    struct ScriptedConsole {
        inputs: VecDeque<Input>,
        prompts: Vec<String>,
        output: Vec<String>,
    }

    impl ScriptedConsole {
        fn answering(inputs: Vec<Input>) -> Self {
            Self {
                inputs: inputs.into(),
                ..Default::default()
            }
        }

        fn printed(&self) -> String {
            self.output.join("\n")
        }

        fn was_asked_to_confirm(&self) -> bool {
            self.prompts.iter().any(|p| p == CONFIRM_PROMPT)
        }
    }

    #[async_trait]
    impl Console for ScriptedConsole {
        async fn read_line(&mut self, prompt: &str) -> Input {
            self.prompts.push(prompt.to_string());
            self.inputs.pop_front().unwrap_or(Input::Eof)
        }

        fn show(&mut self, text: &str) {
            self.output.push(text.to_string());
        }
    }

    fn line(text: &str) -> Input {
        Input::Line(text.to_string())
    }

    fn facts() -> SystemFacts {
        SystemFacts {
            user: "ana".to_string(),
            hostname: "box".to_string(),
            os: "Debian GNU/Linux 12".to_string(),
            kernel: "6.1.0".to_string(),
            cwd: "/home/ana".to_string(),
        }
    }

    fn mediator(
        backend: ScriptedBackend,
        executor: RecordingExecutor,
        console: ScriptedConsole,
    ) -> Mediator<ScriptedBackend, RecordingExecutor, ScriptedConsole> {
        Mediator::new(backend, executor, console, facts(), MediatorConfig::default())
    }

    #[tokio::test]
    async fn declined_command_is_not_executed_but_reply_is_remembered() {
        let raw = "TIPO: COMANDO\nRESPOSTA: ls -la";
        let mut m = mediator(
            ScriptedBackend::replying(raw),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::answering(vec![line("n")]),
        );

        assert_eq!(m.handle_input("liste os arquivos").await, TurnOutcome::Cancelled);

        assert!(m.console.was_asked_to_confirm());
        assert!(m.console.printed().contains("  ls -la"));
        assert!(m.console.printed().contains("Cancelled."));
        assert!(m.executor.calls().is_empty());

        let turns = m.memory().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].text(), "liste os arquivos");
        assert_eq!(turns[1].speaker(), Speaker::Model);
        assert_eq!(turns[1].text(), raw);
    }

    #[tokio::test]
    async fn confirmed_command_runs_with_tokenized_argv() {
        let mut m = mediator(
            ScriptedBackend::replying("TIPO: COMANDO\nRESPOSTA: grep -rn \"fn main\" src"),
            RecordingExecutor::returning("src/main.rs:1:fn main() {}\n", "", Some(0)),
            ScriptedConsole::answering(vec![line("S")]),
        );

        assert_eq!(
            m.handle_input("ache o main").await,
            TurnOutcome::Executed { exit_code: Some(0) }
        );
        assert_eq!(m.executor.calls(), vec![vec!["grep", "-rn", "fn main", "src"]]);

        let printed = m.console.printed();
        assert!(printed.contains("src/main.rs:1:fn main() {}"));
        assert!(!printed.contains("exit code"));
        assert!(!printed.contains("stderr:"));
    }

    #[tokio::test]
    async fn forbidden_command_is_blocked_without_confirmation() {
        let mut m = mediator(
            ScriptedBackend::replying("TIPO: COMANDO\nRESPOSTA: sudo rm -rf /"),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::answering(vec![line("s")]),
        );

        assert_eq!(m.handle_input("limpe o disco").await, TurnOutcome::Blocked);

        assert!(!m.console.was_asked_to_confirm());
        assert!(m.executor.calls().is_empty());
        assert!(m.console.printed().contains("Command blocked for safety:\nsudo rm -rf /"));
        assert_eq!(m.memory().turns().len(), 2);
    }

    #[tokio::test]
    async fn bare_single_line_reply_is_treated_as_command() {
        let mut m = mediator(
            ScriptedBackend::replying("ls -la"),
            RecordingExecutor::returning("total 0\n", "", Some(0)),
            ScriptedConsole::answering(vec![line("yes")]),
        );

        assert_eq!(
            m.handle_input("liste").await,
            TurnOutcome::Executed { exit_code: Some(0) }
        );
        assert_eq!(m.executor.calls(), vec![vec!["ls", "-la"]]);
    }

    #[tokio::test]
    async fn backend_error_skips_classification_and_memory() {
        let mut m = mediator(
            ScriptedBackend::new(vec![Err(BackendError::Unexpected("model exploded".to_string()))]),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::default(),
        );

        assert_eq!(m.handle_input("oi").await, TurnOutcome::BackendFailed);
        assert!(m.console.printed().contains("model exploded"));
        assert!(!m.console.printed().contains("outside the expected format"));
        assert_eq!(m.memory().turns().len(), 1);
        assert_eq!(m.memory().turns()[0].speaker(), Speaker::User);
    }

    #[tokio::test]
    async fn error_marker_reply_is_treated_as_backend_failure() {
        let mut m = mediator(
            ScriptedBackend::replying("Erro de conexão: connection refused"),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::answering(vec![line("s")]),
        );

        assert_eq!(m.handle_input("oi").await, TurnOutcome::BackendFailed);
        assert_eq!(m.console.printed(), "Erro de conexão: connection refused");
        assert!(m.executor.calls().is_empty());
        assert_eq!(m.memory().turns().len(), 1);
    }

    #[tokio::test]
    async fn text_and_nothing_payloads_are_displayed_verbatim() {
        let mut m = mediator(
            ScriptedBackend::new(vec![
                Ok("TIPO: TEXTO\nRESPOSTA: Use df -h.\nOu du -sh.".to_string()),
                Ok("TIPO: NADA\nRESPOSTA: pedido perigoso".to_string()),
            ]),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::default(),
        );

        assert_eq!(m.handle_input("espaço em disco?").await, TurnOutcome::Displayed);
        assert_eq!(m.handle_input("formate tudo").await, TurnOutcome::Displayed);
        assert_eq!(m.console.output, vec!["Use df -h.\nOu du -sh.", "pedido perigoso"]);
        assert_eq!(m.memory().turns().len(), 4);
    }

    #[tokio::test]
    async fn unrecognized_or_empty_payload_is_reported_with_raw_text() {
        let mut m = mediator(
            ScriptedBackend::new(vec![
                Ok("Claro!\nAqui está.".to_string()),
                Ok("TIPO: TEXTO\nRESPOSTA:".to_string()),
                Ok("TIPO: PERGUNTA\nRESPOSTA: qual?".to_string()),
            ]),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::default(),
        );

        for request in ["a", "b", "c"] {
            assert_eq!(m.handle_input(request).await, TurnOutcome::OutsideFormat);
        }
        let printed = m.console.printed();
        assert!(printed.contains("Response outside the expected format:\nClaro!\nAqui está."));
        assert!(printed.contains("TIPO: PERGUNTA\nRESPOSTA: qual?"));
        assert_eq!(m.memory().turns().len(), 6);
    }

    #[tokio::test]
    async fn malformed_quoting_is_an_interpretation_error() {
        let mut m = mediator(
            ScriptedBackend::replying("TIPO: COMANDO\nRESPOSTA: echo \"a"),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::answering(vec![line("s")]),
        );

        assert_eq!(m.handle_input("eco").await, TurnOutcome::TokenizeFailed);
        assert!(!m.console.was_asked_to_confirm());
        assert!(m.console.printed().contains("Could not interpret the command"));
        assert!(m.executor.calls().is_empty());
    }

    #[tokio::test]
    async fn stderr_and_exit_code_are_reported() {
        let mut m = mediator(
            ScriptedBackend::replying("TIPO: COMANDO\nRESPOSTA: ls /nope"),
            RecordingExecutor::returning("", "ls: cannot access '/nope'\n", Some(2)),
            ScriptedConsole::answering(vec![line("s")]),
        );

        assert_eq!(
            m.handle_input("liste /nope").await,
            TurnOutcome::Executed { exit_code: Some(2) }
        );
        let printed = m.console.printed();
        let stderr = printed.find("\nstderr:\nls: cannot access '/nope'").unwrap();
        let code = printed.find("\nexit code: 2").unwrap();
        assert!(stderr < code);
    }

    #[tokio::test]
    async fn missing_program_is_reported_by_name() {
        let mut m = mediator(
            ScriptedBackend::replying("TIPO: COMANDO\nRESPOSTA: nosuchtool --x"),
            RecordingExecutor::not_found(),
            ScriptedConsole::answering(vec![line("s")]),
        );

        assert_eq!(m.handle_input("rode").await, TurnOutcome::ExecFailed);
        assert!(m.console.printed().contains("command not found: nosuchtool"));
    }

    #[tokio::test]
    async fn unrunnable_program_reports_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("audit.jsonl");
        let mut m = mediator(
            ScriptedBackend::replying("TIPO: COMANDO\nRESPOSTA: ./script.sh --now"),
            RecordingExecutor::unrunnable(),
            ScriptedConsole::answering(vec![line("s")]),
        )
        .with_audit(AuditLog::new(&audit_path));

        assert_eq!(m.handle_input("roda o script").await, TurnOutcome::ExecFailed);
        assert_eq!(m.executor.calls(), vec![vec!["./script.sh".to_string(), "--now".to_string()]]);

        let printed = m.console.printed();
        assert!(printed.contains("failed to run ./script.sh: permission denied"));
        assert!(!printed.contains("exit code"));

        let record = tokio::fs::read_to_string(&audit_path).await.unwrap();
        let record: serde_json::Value = serde_json::from_str(record.trim()).unwrap();
        assert_eq!(record["outcome"], "faulted");
        assert!(record["error"].as_str().unwrap().starts_with("failed to run ./script.sh"));
    }

    #[tokio::test]
    async fn outcome_follows_offline_verdict() {
        let replies = [
            ("TIPO: TEXTO\nRESPOSTA: oi", TurnOutcome::Displayed),
            ("TIPO: COMANDO\nRESPOSTA: rm -rf /", TurnOutcome::Blocked),
            ("TIPO: COMANDO\nRESPOSTA: echo 'a", TurnOutcome::TokenizeFailed),
            ("TIPO: FOO\nRESPOSTA: x", TurnOutcome::OutsideFormat),
            ("ls -la", TurnOutcome::Executed { exit_code: Some(0) }),
        ];

        for (reply, expected) in replies {
            let decision = evaluate(reply).decision;
            let mut m = mediator(
                ScriptedBackend::replying(reply),
                RecordingExecutor::returning("", "", Some(0)),
                ScriptedConsole::answering(vec![line("s")]),
            );
            let outcome = m.handle_input("pedido").await;
            assert_eq!(outcome, expected, "reply {reply:?} decided {decision:?}");
            assert_eq!(
                decision == Decision::ConfirmAndExecute,
                m.console.was_asked_to_confirm(),
                "reply {reply:?}"
            );
        }
    }

    #[tokio::test]
    async fn end_of_input_during_confirmation_cancels() {
        let mut m = mediator(
            ScriptedBackend::replying("TIPO: COMANDO\nRESPOSTA: uptime"),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::answering(vec![Input::Interrupted]),
        );

        assert_eq!(m.handle_input("uptime?").await, TurnOutcome::Cancelled);
        assert!(m.executor.calls().is_empty());
    }

    #[tokio::test]
    async fn prompt_carries_bounded_history_and_request() {
        let backend = ScriptedBackend::new(vec![
            Ok("TIPO: TEXTO\nRESPOSTA: um".to_string()),
            Ok("TIPO: TEXTO\nRESPOSTA: dois".to_string()),
        ]);
        let config = MediatorConfig {
            language: Language::Pt,
            history_turns: 2,
        };
        let mut m = Mediator::new(
            backend,
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::default(),
            facts(),
            config,
        );

        m.handle_input("primeiro").await;
        m.handle_input("segundo").await;

        let prompts = m.backend.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Histórico:\nUsuário: primeiro\n"));
        assert!(prompts[1].contains("Histórico:\nIA: TIPO: TEXTO\nRESPOSTA: um\nUsuário: segundo\n"));
        assert!(!prompts[1].contains("Usuário: primeiro"));
        assert!(prompts[1].contains("Máquina: box"));
        assert!(prompts[1].trim_end().ends_with("Pedido: segundo"));
    }

    #[tokio::test]
    async fn run_skips_empty_input_and_stops_on_quit_word() {
        let mut m = mediator(
            ScriptedBackend::new(vec![]),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::answering(vec![line("   "), line("EXIT"), line("never read")]),
        );

        m.run().await;

        assert!(m.backend.prompts.lock().unwrap().is_empty());
        assert!(m.memory().turns().is_empty());
        assert_eq!(m.console.inputs.len(), 1);
        assert!(m.console.printed().ends_with("Goodbye."));
    }

    #[tokio::test]
    async fn run_shuts_down_on_interrupt() {
        let mut m = mediator(
            ScriptedBackend::new(vec![]),
            RecordingExecutor::returning("", "", Some(0)),
            ScriptedConsole::answering(vec![Input::Interrupted, line("never read")]),
        );

        m.run().await;

        assert!(m.console.printed().ends_with("\nShutting down."));
        assert_eq!(m.console.inputs.len(), 1);
    }

    #[tokio::test]
    async fn command_decisions_are_audited() {
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("audit.jsonl");

        let mut m = mediator(
            ScriptedBackend::new(vec![
                Ok("TIPO: COMANDO\nRESPOSTA: reboot".to_string()),
                Ok("TIPO: COMANDO\nRESPOSTA: whoami".to_string()),
            ]),
            RecordingExecutor::returning("ana\n", "", Some(0)),
            ScriptedConsole::answering(vec![line("s")]),
        )
        .with_audit(AuditLog::new(&audit_path));

        m.handle_input("reinicie").await;
        m.handle_input("quem sou eu").await;

        let text = tokio::fs::read_to_string(&audit_path).await.unwrap();
        let records: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["outcome"], "blocked");
        assert_eq!(records[0]["pattern"], "reboot");
        assert_eq!(records[0]["request"], "reinicie");
        assert_eq!(records[1]["outcome"], "executed");
        assert_eq!(records[1]["command"], "whoami");
        assert_eq!(records[1]["stdout_bytes"], 4);
    }

    #[test]
    fn quit_and_confirmation_words() {
        for w in ["sair", "EXIT", " Quit "] {
            assert!(is_quit_command(w));
        }
        assert!(!is_quit_command("exit now"));

        for w in ["s", "S", "sim", "y", "Yes"] {
            assert!(is_affirmative(w));
        }
        for w in ["", "n", "nao", "no", "sure"] {
            assert!(!is_affirmative(w));
        }
    }
}
