// ABOUTME: classifies loosely formatted model replies into a typed action and payload.
// ABOUTME: pure parsing over a two-marker line grammar so every failure mode is enumerable.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Line prefixes that introduce the action kind, matched case-insensitively.
pub const TYPE_MARKERS: &[&str] = &["TIPO:", "TYPE:"];

/// Line prefixes that introduce the payload, matched case-insensitively.
pub const PAYLOAD_MARKERS: &[&str] = &["RESPOSTA:", "ANSWER:", "RESPONSE:"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Text,
    Command,
    #[serde(rename = "NONE")]
    Nothing,
    Unrecognized,
}

impl ActionKind {
    /// Maps an upper-cased kind label from either grammar vocabulary.
    pub fn from_label(label: &str) -> Self {
        match label {
            "TEXTO" | "TEXT" => ActionKind::Text,
            "COMANDO" | "COMMAND" => ActionKind::Command,
            "NADA" | "NONE" => ActionKind::Nothing,
            _ => ActionKind::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ParsedAction {
    pub kind: ActionKind,
    /// Upper-cased text found after the type marker; absent when no marker was found.
    pub label: Option<String>,
    pub payload: Option<String>,
}

impl ParsedAction {
    pub fn unrecognized() -> Self {
        Self {
            kind: ActionKind::Unrecognized,
            label: None,
            payload: None,
        }
    }

    /// Payload that carries actual content, if any.
    pub fn non_empty_payload(&self) -> Option<&str> {
        self.payload.as_deref().filter(|p| !p.is_empty())
    }
}

fn strip_marker<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    markers.iter().find_map(|marker| {
        let prefix = line.get(..marker.len())?;
        if prefix.eq_ignore_ascii_case(marker) {
            Some(&line[marker.len()..])
        } else {
            None
        }
    })
}

/// Line boundaries for reply text: `\n`, `\r`, and the other unicode breaks.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

pub fn classify(text: &str) -> ParsedAction {
    let lines: Vec<&str> = text
        .split(is_line_break)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    for (i, line) in lines.iter().enumerate() {
        let Some(rest) = strip_marker(line, TYPE_MARKERS) else {
            continue;
        };

        let label = rest.trim().to_uppercase();
        let kind = ActionKind::from_label(&label);
        let following = &lines[i + 1..];

        let payload = match following
            .iter()
            .enumerate()
            .find_map(|(j, l)| strip_marker(l, PAYLOAD_MARKERS).map(|p| (j, p)))
        {
            Some((j, head)) => {
                let mut payload = head.trim().to_string();
                let tail = &following[j + 1..];
                if !tail.is_empty() {
                    payload.push('\n');
                    payload.push_str(&tail.join("\n"));
                }
                Some(payload)
            }
            None => following.first().map(|l| l.to_string()),
        };

        return ParsedAction {
            kind,
            label: Some(label),
            payload,
        };
    }

    ParsedAction::unrecognized()
}

/// Classifies `raw`, treating a marker-free single-line reply as a bare command.
///
/// Returns the action and whether the bare-command fallback was applied.
pub fn classify_with_fallback(raw: &str) -> (ParsedAction, bool) {
    let parsed = classify(raw);
    if parsed.label.is_none() && !raw.trim().is_empty() && !raw.contains('\n') {
        let action = ParsedAction {
            kind: ActionKind::Command,
            label: None,
            payload: Some(raw.trim().to_string()),
        };
        return (action, true);
    }
    (parsed, false)
}
