//! Per-call answer state, keyed by node id so a node keeps its answers when revisited.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recorded checklist answer. An unanswered item has no entry at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistAnswer {
    #[serde(rename = "checked")]
    Checked,
    Yes,
    No,
}

impl fmt::Display for ChecklistAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecklistAnswer::Checked => write!(f, "checked"),
            ChecklistAnswer::Yes => write!(f, "Yes"),
            ChecklistAnswer::No => write!(f, "No"),
        }
    }
}

/// Answers for one checklist node: cleaned item text -> answer.
pub type ChecklistAnswers = AHashMap<String, ChecklistAnswer>;
/// Word-track fill-ins for one node: variable name -> text.
pub type VariableValues = AHashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    checklists: AHashMap<String, ChecklistAnswers>,
    variables: AHashMap<String, VariableValues>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer for `item`, or clears it when `answer` is `None`.
    pub fn set_checklist_answer(&mut self, node_id: &str, item: &str, answer: Option<ChecklistAnswer>) {
        let answers = self.checklists.entry(node_id.to_string()).or_default();
        match answer {
            Some(answer) => {
                answers.insert(item.to_string(), answer);
            }
            None => {
                answers.remove(item);
            }
        }
    }

    /// Flips a plain checkbox item between checked and unanswered.
    pub fn toggle_checkbox(&mut self, node_id: &str, item: &str) -> bool {
        let checked = self.checklist_answer(node_id, item).is_some();
        let next = (!checked).then_some(ChecklistAnswer::Checked);
        self.set_checklist_answer(node_id, item, next);
        !checked
    }

    pub fn checklist_answer(&self, node_id: &str, item: &str) -> Option<ChecklistAnswer> {
        self.checklists
            .get(node_id)
            .and_then(|answers| answers.get(item))
            .copied()
    }

    /// A copy of every answer recorded for `node_id` (empty if none).
    pub fn checklist_snapshot(&self, node_id: &str) -> ChecklistAnswers {
        self.checklists.get(node_id).cloned().unwrap_or_default()
    }

    /// Stores a word-track value. An empty value removes the entry.
    pub fn set_variable(&mut self, node_id: &str, name: &str, value: &str) {
        let values = self.variables.entry(node_id.to_string()).or_default();
        if value.is_empty() {
            values.remove(name);
        } else {
            values.insert(name.to_string(), value.to_string());
        }
    }

    pub fn variable(&self, node_id: &str, name: &str) -> Option<&str> {
        self.variables
            .get(node_id)
            .and_then(|values| values.get(name))
            .map(String::as_str)
    }

    pub fn variables_snapshot(&self, node_id: &str) -> VariableValues {
        self.variables.get(node_id).cloned().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.checklists.clear();
        self.variables.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.checklists.values().all(|a| a.is_empty()) && self.variables.values().all(|v| v.is_empty())
    }
}
