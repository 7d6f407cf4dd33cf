// ABOUTME: assembles the model prompt from persona, system facts, history, grammar and request.
// ABOUTME: the grammar section spells out the exact marker lines the classifier understands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::memory::SpeakerLabels;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub fn grammar(self) -> &'static Grammar {
        match self {
            Language::Pt => &PORTUGUESE,
            Language::En => &ENGLISH,
        }
    }
}

/// Vocabulary used when talking to the model in one language.
#[derive(Debug)]
pub struct Grammar {
    pub persona: &'static str,
    pub type_marker: &'static str,
    pub payload_marker: &'static str,
    pub text_kind: &'static str,
    pub command_kind: &'static str,
    pub nothing_kind: &'static str,
    pub text_hint: &'static str,
    pub command_hint: &'static str,
    pub nothing_hint: &'static str,
    pub format_intro: &'static str,
    pub never_omit: &'static str,
    pub history_heading: &'static str,
    pub request_label: &'static str,
    pub facts: FactLabels,
    pub speakers: SpeakerLabels,
}

#[derive(Debug)]
pub struct FactLabels {
    pub user: &'static str,
    pub hostname: &'static str,
    pub os: &'static str,
    pub kernel: &'static str,
    pub cwd: &'static str,
}

pub static PORTUGUESE: Grammar = Grammar {
    persona: "Você é um assistente Linux seguro.",
    type_marker: "TIPO:",
    payload_marker: "RESPOSTA:",
    text_kind: "TEXTO",
    command_kind: "COMANDO",
    nothing_kind: "NADA",
    text_hint: "texto",
    command_hint: "comando",
    nothing_hint: "motivo curto",
    format_intro: "Responda usando EXATAMENTE um formato:",
    never_omit: "Nunca omita",
    history_heading: "Histórico:",
    request_label: "Pedido:",
    facts: FactLabels {
        user: "Usuário",
        hostname: "Máquina",
        os: "Sistema",
        kernel: "Kernel",
        cwd: "Diretório atual",
    },
    speakers: SpeakerLabels {
        user: "Usuário",
        model: "IA",
    },
};

pub static ENGLISH: Grammar = Grammar {
    persona: "You are a careful Linux assistant.",
    type_marker: "TYPE:",
    payload_marker: "ANSWER:",
    text_kind: "TEXT",
    command_kind: "COMMAND",
    nothing_kind: "NONE",
    text_hint: "text",
    command_hint: "command",
    nothing_hint: "short reason",
    format_intro: "Reply using EXACTLY one format:",
    never_omit: "Never omit",
    history_heading: "History:",
    request_label: "Request:",
    facts: FactLabels {
        user: "User",
        hostname: "Host",
        os: "System",
        kernel: "Kernel",
        cwd: "Working directory",
    },
    speakers: SpeakerLabels {
        user: "User",
        model: "Assistant",
    },
};

/// Host facts gathered once at startup and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemFacts {
    pub user: String,
    pub hostname: String,
    pub os: String,
    pub kernel: String,
    pub cwd: String,
}

impl Grammar {
    fn facts_block(&self, facts: &SystemFacts) -> String {
        let l = &self.facts;
        format!(
            "{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}",
            l.user, facts.user, l.hostname, facts.hostname, l.os, facts.os, l.kernel, facts.kernel, l.cwd, facts.cwd
        )
    }

    fn format_block(&self) -> String {
        let option = |kind: &str, hint: &str| format!("{} {kind}\n{} {hint}", self.type_marker, self.payload_marker);
        format!(
            "{}\n\n{}\n\n{}\n\n{}\n\n{} \"{}\".",
            self.format_intro,
            option(self.text_kind, self.text_hint),
            option(self.command_kind, self.command_hint),
            option(self.nothing_kind, self.nothing_hint),
            self.never_omit,
            self.payload_marker,
        )
    }
}

pub fn build_prompt(grammar: &Grammar, facts: &SystemFacts, history: &str, request: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}\n{}\n\n{}\n\n{} {}\n",
        grammar.persona,
        grammar.facts_block(facts),
        grammar.history_heading,
        history,
        grammar.format_block(),
        grammar.request_label,
        request,
    )
}
