// ABOUTME: wires the pure mediation core to a model server, a terminal and the local process table.
// ABOUTME: each collaborator sits behind a trait so the turn loop can be driven by scripted fakes.

pub mod audit;
pub mod backend;
pub mod console;
pub mod executor;
pub mod facts;
pub mod mediator;

pub use audit::{AuditLog, CommandOutcome};
pub use backend::{Backend, BackendError, OllamaBackend, OllamaConfig};
pub use console::{Console, Input, TerminalConsole};
pub use executor::{ExecError, ExecutionResult, Executor, ProcessExecutor};
pub use mediator::{Mediator, MediatorConfig, TurnOutcome};
