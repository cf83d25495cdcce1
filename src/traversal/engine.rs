use super::history::{CapturedAnswers, HistoryEntry};
use super::resolve::{ResolvedScript, resolve_start};
use crate::answers::AnswerStore;
use crate::document::{FlowNode, NodeData, PlaybookDocument};
use crate::error::TraversalError;
use crate::template::{QuoteForm, fill_template, render_quote};
use tracing::debug;

/// One option offered to the agent at the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub target_id: String,
}

/// Per-visit input that only becomes part of history when a transition commits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub carrier_id: Option<String>,
    pub call_type: Option<String>,
    pub quote: QuoteForm,
}

/// Walks an agent through a playbook one node at a time.
///
/// The traversal borrows the document; everything it accumulates (current node, history,
/// answers, selections) lives only as long as the call.
pub struct Traversal<'a> {
    document: &'a PlaybookDocument,
    current_id: Option<String>,
    history: Vec<HistoryEntry>,
    answers: AnswerStore,
    selection: Selection,
}

impl<'a> Traversal<'a> {
    /// Starts a call at the document's effective start node.
    pub fn new(document: &'a PlaybookDocument) -> Self {
        let current_id = resolve_start(document).map(|(node, tier)| {
            debug!(node_id = %node.id, ?tier, "resolved start node");
            node.id.clone()
        });
        Self {
            document,
            current_id,
            history: Vec::new(),
            answers: AnswerStore::new(),
            selection: Selection::default(),
        }
    }

    pub fn document(&self) -> &'a PlaybookDocument {
        self.document
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn current_node(&self) -> Option<&'a FlowNode> {
        let document = self.document;
        self.current_id.as_deref().and_then(|id| document.node(id))
    }

    /// Outgoing options of the current node in document order. Empty at a terminal node.
    pub fn current_options(&self) -> Vec<Choice> {
        match self.current_id.as_deref() {
            Some(id) => self
                .document
                .outgoing(id)
                .map(|edge| Choice {
                    label: edge.label.clone(),
                    target_id: edge.target.clone(),
                })
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.current_options().is_empty()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn answers_mut(&mut self) -> &mut AnswerStore {
        &mut self.answers
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_carrier(&mut self, carrier_id: &str) -> Result<(), TraversalError> {
        if self.document.carrier(carrier_id).is_none() {
            return Err(TraversalError::UnknownCarrier(carrier_id.to_string()));
        }
        self.selection.carrier_id = Some(carrier_id.to_string());
        Ok(())
    }

    pub fn select_call_type(&mut self, call_type: &str) {
        self.selection.call_type = Some(call_type.to_string());
    }

    /// The call type in effect at the current carrier node: the agent's pick, else the
    /// node's default, resolved against the document's call types.
    pub fn effective_call_type(&self) -> Option<&'a str> {
        let NodeData::CarrierLookup(data) = &self.current_node()?.data else {
            return None;
        };
        let requested = match &self.selection.call_type {
            Some(picked) => self
                .document
                .call_types
                .iter()
                .find(|t| *t == picked)
                .map(String::as_str)
                .unwrap_or(data.default_call_type.as_str()),
            None => data.default_call_type.as_str(),
        };
        Some(self.document.resolve_call_type(requested))
    }

    /// Preview of the script for the selected carrier and call type.
    pub fn current_carrier_script(&self) -> Option<ResolvedScript> {
        let carrier = self
            .selection
            .carrier_id
            .as_deref()
            .and_then(|id| self.document.carrier(id))?;
        let call_type = self.effective_call_type()?;
        Some(carrier.resolve_script(call_type))
    }

    pub fn quote_form(&self) -> &QuoteForm {
        &self.selection.quote
    }

    pub fn quote_form_mut(&mut self) -> &mut QuoteForm {
        &mut self.selection.quote
    }

    /// The quote script for the current quote node, recomputed from the form on every call.
    pub fn current_quote_script(&self) -> Option<String> {
        let NodeData::Quote(data) = &self.current_node()?.data else {
            return None;
        };
        Some(render_quote(
            &self.document.quote_settings,
            &self.document.carriers,
            &self.selection.quote,
            data.closing_question.as_deref(),
        ))
    }

    /// The current word-track node's template filled with the values entered so far.
    pub fn current_word_track(&self) -> Option<String> {
        let node = self.current_node()?;
        let NodeData::WordTrack(data) = &node.data else {
            return None;
        };
        Some(fill_template(
            &data.template,
            &self.answers.variables_snapshot(&node.id),
        ))
    }

    /// Whether the current node's preconditions for leaving it are met.
    pub fn can_advance(&self) -> bool {
        match self.current_node() {
            Some(node) => match node.data {
                NodeData::CarrierLookup(_) => self.selection.carrier_id.is_some(),
                _ => true,
            },
            None => false,
        }
    }

    fn capture(&self, node: &FlowNode) -> Result<CapturedAnswers, TraversalError> {
        Ok(match &node.data {
            NodeData::CarrierLookup(_) => {
                let carrier = self
                    .selection
                    .carrier_id
                    .as_deref()
                    .ok_or_else(|| TraversalError::CarrierNotSelected {
                        node_id: node.id.clone(),
                    })?;
                let carrier = self
                    .document
                    .carrier(carrier)
                    .ok_or_else(|| TraversalError::UnknownCarrier(carrier.to_string()))?;
                let call_type = self.effective_call_type().unwrap_or_default().to_string();
                let script = carrier.resolve_script(&call_type).html;
                CapturedAnswers::Carrier {
                    carrier: carrier.clone(),
                    call_type,
                    script,
                }
            }
            NodeData::Checklist(_) => {
                CapturedAnswers::Checklist(self.answers.checklist_snapshot(&node.id))
            }
            NodeData::WordTrack(data) => {
                let variables = self.answers.variables_snapshot(&node.id);
                CapturedAnswers::WordTrack {
                    filled: fill_template(&data.template, &variables),
                    variables,
                }
            }
            NodeData::Script(_) | NodeData::Quote(_) => CapturedAnswers::None,
        })
    }

    /// Leaves the current node through an edge to `target_id`, recording the visit.
    ///
    /// `label` is the option text the agent chose; a blank label falls back to the edge's.
    pub fn advance(&mut self, target_id: &str, label: &str) -> Result<(), TraversalError> {
        let node = self.current_node().ok_or(TraversalError::NoCurrentNode)?;
        let edge = self
            .document
            .outgoing(&node.id)
            .find(|e| e.target == target_id)
            .ok_or_else(|| TraversalError::NotAnOption {
                from_id: node.id.clone(),
                target_id: target_id.to_string(),
            })?;
        let captured = self.capture(node)?;
        let label = if label.trim().is_empty() {
            edge.label.as_str()
        } else {
            label
        };

        debug!(from = %node.id, to = %target_id, %label, "advancing");
        self.history
            .push(HistoryEntry::new(node.clone(), label, captured));
        self.current_id = Some(target_id.to_string());
        self.selection = Selection::default();
        Ok(())
    }

    /// Takes the `index`-th option of the current node.
    pub fn choose(&mut self, index: usize) -> Result<(), TraversalError> {
        let options = self.current_options();
        let choice = options.get(index).ok_or_else(|| TraversalError::NotAnOption {
            from_id: self.current_id.clone().unwrap_or_default(),
            target_id: format!("#{}", index),
        })?;
        self.advance(&choice.target_id, &choice.label)
    }

    /// Returns to the visit recorded at `index`, discarding it and every later entry.
    ///
    /// A carrier selection made during that visit is restored so it can be re-confirmed.
    pub fn jump_to(&mut self, index: usize) -> Result<(), TraversalError> {
        if index >= self.history.len() {
            return Err(TraversalError::HistoryIndexOutOfRange {
                index,
                len: self.history.len(),
            });
        }
        let entry = self.history.swap_remove(index);
        self.history.truncate(index);

        self.selection = match entry.captured() {
            CapturedAnswers::Carrier {
                carrier, call_type, ..
            } => Selection {
                carrier_id: Some(carrier.id.clone()),
                call_type: Some(call_type.clone()),
                quote: QuoteForm::default(),
            },
            _ => Selection::default(),
        };
        debug!(index, node_id = %entry.node().id, "jumped back in history");
        self.current_id = Some(entry.node().id.clone());
        Ok(())
    }

    /// Back to the start node with no history, answers or selections.
    pub fn reset(&mut self) {
        self.current_id = resolve_start(self.document).map(|(node, _)| node.id.clone());
        self.history.clear();
        self.answers.clear();
        self.selection = Selection::default();
        debug!("traversal reset");
    }
}
