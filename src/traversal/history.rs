use crate::answers::{ChecklistAnswers, VariableValues};
use crate::document::{Carrier, FlowNode};

/// Data captured from the agent's interaction with a node when leaving it.
#[derive(Debug, Clone)]
pub enum CapturedAnswers {
    /// Script and quote nodes capture nothing beyond the node itself.
    None,
    Carrier {
        carrier: Carrier,
        call_type: String,
        script: String,
    },
    Checklist(ChecklistAnswers),
    WordTrack {
        filled: String,
        variables: VariableValues,
    },
}

/// An immutable record of one visited node and the option chosen to leave it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    node: FlowNode,
    chosen_label: String,
    captured: CapturedAnswers,
}

impl HistoryEntry {
    pub fn new(node: FlowNode, chosen_label: impl Into<String>, captured: CapturedAnswers) -> Self {
        Self {
            node,
            chosen_label: chosen_label.into(),
            captured,
        }
    }

    /// The node as it was when visited.
    pub fn node(&self) -> &FlowNode {
        &self.node
    }

    pub fn chosen_label(&self) -> &str {
        &self.chosen_label
    }

    pub fn captured(&self) -> &CapturedAnswers {
        &self.captured
    }
}
