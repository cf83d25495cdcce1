//! Editor actions. Every mutation keeps edges consistent with the node list.

use super::defaults::default_node_data;
use super::model::*;
use crate::error::EditError;
use rand::Rng;
use tracing::debug;

const RANDOM_ID_RANGE: u32 = 10_000;
const RANDOM_ID_ATTEMPTS: usize = 64;

impl PlaybookDocument {
    /// Produces a node id not used by any node in this document.
    pub fn generate_node_id(&self) -> String {
        let mut rng = rand::rng();
        for _ in 0..RANDOM_ID_ATTEMPTS {
            let candidate = rng.random_range(0..RANDOM_ID_RANGE).to_string();
            if self.node(&candidate).is_none() {
                return candidate;
            }
        }
        let next = self
            .nodes
            .iter()
            .filter_map(|n| n.id.parse::<u64>().ok())
            .max()
            .map_or(RANDOM_ID_RANGE as u64, |max| max + 1);
        next.to_string()
    }

    /// Produces an edge id not used by any edge in this document.
    pub fn generate_edge_id(&self, source: &str, target: &str) -> String {
        let taken = |candidate: &str| self.edges.iter().any(|e| e.id.as_deref() == Some(candidate));
        let mut rng = rand::rng();
        for _ in 0..RANDOM_ID_ATTEMPTS {
            let candidate = format!("e{}-{}-{}", source, target, rng.random_range(0..RANDOM_ID_RANGE));
            if !taken(&candidate) {
                return candidate;
            }
        }
        (self.edges.len()..)
            .map(|n| format!("e{}-{}-{}", source, target, n + RANDOM_ID_RANGE as usize))
            .find(|candidate| !taken(candidate))
            .unwrap_or_default()
    }

    /// Appends a node of `kind` with type-appropriate defaults and returns its id.
    pub fn add_node(&mut self, kind: NodeKind) -> String {
        let id = self.generate_node_id();
        let mut node = FlowNode::new(id.clone(), default_node_data(kind, &self.call_types));
        node.position = Position::new(250.0, 150.0);
        debug!(node_id = %id, kind = kind.tag(), "added node");
        self.nodes.push(node);
        id
    }

    /// Replaces the whole data payload of node `id`. The payload variant defines the node type.
    pub fn update_node_data(&mut self, id: &str, data: NodeData) -> Result<(), EditError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| EditError::NodeNotFound(id.to_string()))?;
        node.data = data;
        Ok(())
    }

    /// Flags `id` as the start node and clears the flag everywhere else.
    pub fn set_start_node(&mut self, id: &str) -> Result<(), EditError> {
        if self.node(id).is_none() {
            return Err(EditError::NodeNotFound(id.to_string()));
        }
        for node in &mut self.nodes {
            node.is_start = node.id == id;
        }
        Ok(())
    }

    /// Connects two existing nodes. A blank label becomes "Next".
    pub fn connect(&mut self, source: &str, target: &str, label: &str) -> Result<usize, EditError> {
        for id in [source, target] {
            if self.node(id).is_none() {
                return Err(EditError::NodeNotFound(id.to_string()));
            }
        }
        let mut edge = FlowEdge::new(source, target, label);
        edge.id = Some(self.generate_edge_id(source, target));
        self.edges.push(edge);
        Ok(self.edges.len() - 1)
    }

    pub fn remove_edge(&mut self, index: usize) -> Result<FlowEdge, EditError> {
        if index >= self.edges.len() {
            return Err(EditError::EdgeNotFound(index));
        }
        Ok(self.edges.remove(index))
    }

    /// Removes a node together with every edge that references it.
    pub fn remove_node(&mut self, id: &str) -> Result<FlowNode, EditError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| EditError::NodeNotFound(id.to_string()))?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| !e.touches(id));
        debug!(node_id = %id, "removed node and its edges");
        Ok(node)
    }

    pub fn set_node_selected(&mut self, id: &str, selected: bool) -> Result<(), EditError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| EditError::NodeNotFound(id.to_string()))?;
        node.selected = selected;
        Ok(())
    }

    pub fn set_edge_selected(&mut self, index: usize, selected: bool) -> Result<(), EditError> {
        let edge = self
            .edges
            .get_mut(index)
            .ok_or(EditError::EdgeNotFound(index))?;
        edge.selected = selected;
        Ok(())
    }

    /// Deletes selected nodes (cascading to their edges) and selected edges.
    /// Returns the number of nodes and edges removed.
    pub fn remove_selected(&mut self) -> (usize, usize) {
        let doomed: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect();
        let edges_before = self.edges.len();
        self.nodes.retain(|n| !n.selected);
        self.edges
            .retain(|e| !e.selected && !doomed.iter().any(|id| e.touches(id)));
        (doomed.len(), edges_before - self.edges.len())
    }

    /// Inserts or replaces a carrier under its own id.
    pub fn upsert_carrier(&mut self, carrier: Carrier) {
        self.carriers.insert(carrier.id.clone(), carrier);
    }

    /// Creates an empty carrier and returns its id.
    pub fn add_carrier(&mut self, name: &str) -> String {
        let id = chrono::Utc::now().timestamp_millis().to_string();
        let id = if self.carriers.contains_key(&id) {
            format!("{}-{}", id, self.carriers.len())
        } else {
            id
        };
        self.upsert_carrier(Carrier {
            id: id.clone(),
            name: name.to_string(),
            ..Carrier::default()
        });
        id
    }

    pub fn remove_carrier(&mut self, id: &str) -> Result<Carrier, EditError> {
        self.carriers
            .shift_remove(id)
            .ok_or_else(|| EditError::CarrierNotFound(id.to_string()))
    }

    /// Replaces the call-type list. The list may not be empty.
    pub fn set_call_types(&mut self, call_types: Vec<String>) -> Result<(), EditError> {
        let call_types: Vec<String> = call_types
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if call_types.is_empty() {
            return Err(EditError::EmptyCallTypes);
        }
        self.call_types = call_types;
        Ok(())
    }
}
