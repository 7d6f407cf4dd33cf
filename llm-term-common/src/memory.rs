// ABOUTME: keeps the append-only conversation log that feeds prompt history.
// ABOUTME: only the most recent turns are rendered; storage itself is never trimmed.

use serde::{Deserialize, Serialize};

/// Number of turns rendered into a prompt unless configured otherwise.
pub const DEFAULT_HISTORY_TURNS: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Model,
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// How each speaker is named in the rendered transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerLabels {
    pub user: &'static str,
    pub model: &'static str,
}

impl SpeakerLabels {
    fn label(&self, speaker: Speaker) -> &'static str {
        match speaker {
            Speaker::User => self.user,
            Speaker::Model => self.model,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationMemory {
    labels: SpeakerLabels,
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new(labels: SpeakerLabels) -> Self {
        Self {
            labels,
            turns: Vec::new(),
        }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `n` turns in insertion order.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Renders the last `n` turns as `speaker: text`, one turn per entry.
    pub fn recent_history(&self, n: usize) -> String {
        self.recent(n)
            .iter()
            .map(|t| format!("{}: {}", self.labels.label(t.speaker), t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
