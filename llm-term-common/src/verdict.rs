// ABOUTME: evaluates a raw model reply offline without prompting or executing anything.
// ABOUTME: reports what the mediation loop would decide so replies can be checked from scripts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_with_fallback, ActionKind};
use crate::gate;
use crate::tokenize::tokenize;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Display,
    Blocked,
    TokenizeFailed,
    ConfirmAndExecute,
    OutsideFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Verdict {
    pub kind: ActionKind,
    pub label: Option<String>,
    pub payload: Option<String>,
    /// True when the reply had no markers and was taken as a bare command.
    pub fallback: bool,
    pub decision: Decision,
    pub blocked_by: Option<String>,
    pub argv: Option<Vec<String>>,
    pub error: Option<String>,
}

pub fn evaluate(raw: &str) -> Verdict {
    let (action, fallback) = classify_with_fallback(raw);
    let mut verdict = Verdict {
        kind: action.kind,
        label: action.label.clone(),
        payload: action.payload.clone(),
        fallback,
        decision: Decision::OutsideFormat,
        blocked_by: None,
        argv: None,
        error: None,
    };

    let Some(payload) = action.non_empty_payload() else {
        return verdict;
    };

    match action.kind {
        ActionKind::Text | ActionKind::Nothing => verdict.decision = Decision::Display,
        ActionKind::Command => {
            let command = payload.trim();
            if let Some(pattern) = gate::matched_pattern(command) {
                verdict.decision = Decision::Blocked;
                verdict.blocked_by = Some(pattern.to_string());
                return verdict;
            }
            match tokenize(command) {
                Ok(argv) => {
                    verdict.decision = Decision::ConfirmAndExecute;
                    verdict.argv = Some(argv);
                }
                Err(err) => {
                    verdict.decision = Decision::TokenizeFailed;
                    verdict.error = Some(err.to_string());
                }
            }
        }
        ActionKind::Unrecognized => {}
    }

    verdict
}
