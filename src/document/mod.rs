//! The playbook document: nodes, edges, carriers and the settings that drive rendering.

mod checklist;
mod defaults;
mod edit;
mod model;
pub mod raw;

pub use checklist::*;
pub use defaults::*;
pub use model::*;

use crate::error::StoreError;

impl PlaybookDocument {
    /// Parses a persisted playbook. Missing collections are filled with defaults.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Parse {
            name: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serializes the persisted form. Runtime-only editor state is not written.
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialize {
            name: self.filename.clone().unwrap_or_default(),
            message: e.to_string(),
        })
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut FlowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Edges leaving `id`, in document order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn carrier(&self, id: &str) -> Option<&Carrier> {
        self.carriers.get(id)
    }

    /// Returns `requested` if it is one of this document's call types, else the first one.
    pub fn resolve_call_type<'a>(&'a self, requested: &'a str) -> &'a str {
        if self.call_types.iter().any(|t| t == requested) {
            requested
        } else {
            self.call_types
                .first()
                .map(String::as_str)
                .unwrap_or(requested)
        }
    }

    pub fn search_issues<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.matches(query))
    }
}
