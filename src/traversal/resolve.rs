//! Ordered fallback chains, exposed with the tier that answered so each can be tested alone.

use crate::document::{Carrier, FlowNode, PlaybookDocument, START_NODE_ID};

pub const MISSING_SCRIPT: &str = "<p><i>No script for this call type.</i></p>";

/// Which rule picked the start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTier {
    /// A node carries `isStart`.
    Flagged,
    /// No node is flagged; the node with the conventional id `"1"` is used.
    ConventionalId,
    /// Neither of the above; the first node in document order is used.
    FirstNode,
}

/// Resolves the effective start node. `None` only for a document without nodes.
pub fn resolve_start(document: &PlaybookDocument) -> Option<(&FlowNode, StartTier)> {
    document
        .nodes
        .iter()
        .find(|n| n.is_start)
        .map(|n| (n, StartTier::Flagged))
        .or_else(|| document.node(START_NODE_ID).map(|n| (n, StartTier::ConventionalId)))
        .or_else(|| document.nodes.first().map(|n| (n, StartTier::FirstNode)))
}

/// Where a carrier script came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSource {
    CallType,
    Legacy,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScript {
    pub html: String,
    pub source: ScriptSource,
}

impl Carrier {
    /// The script for `call_type`, else the legacy single script, else a placeholder.
    /// Blank scripts count as missing.
    pub fn resolve_script(&self, call_type: &str) -> ResolvedScript {
        let present = |s: &&String| !s.trim().is_empty();
        if let Some(html) = self.scripts.get(call_type).filter(present) {
            return ResolvedScript {
                html: html.clone(),
                source: ScriptSource::CallType,
            };
        }
        if let Some(html) = self.legacy_script.as_ref().filter(present) {
            return ResolvedScript {
                html: html.clone(),
                source: ScriptSource::Legacy,
            };
        }
        ResolvedScript {
            html: MISSING_SCRIPT.to_string(),
            source: ScriptSource::Missing,
        }
    }
}
