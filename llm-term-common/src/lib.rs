// ABOUTME: defines the pure mediation core shared by the llmterm shell and offline tooling.
// ABOUTME: classification, gating, tokenizing, memory and prompts stay free of any i/o.

pub mod classify;
pub mod gate;
pub mod memory;
pub mod prompt;
pub mod tokenize;
pub mod verdict;

pub use classify::{classify, classify_with_fallback, ActionKind, ParsedAction};
pub use gate::{is_forbidden, matched_pattern, DENYLIST};
pub use memory::{ConversationMemory, Speaker, SpeakerLabels, Turn, DEFAULT_HISTORY_TURNS};
pub use prompt::{build_prompt, Grammar, Language, SystemFacts};
pub use tokenize::{tokenize, TokenizeError};
pub use verdict::{evaluate, Decision, Verdict};
