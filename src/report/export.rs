//! Plain-text export of a whole playbook: metadata, call types, carrier scripts and the
//! call flow printed as a tree from the start node.

use super::layout::reachable;
use crate::document::{ChecklistItem, FlowNode, NodeData, PlaybookDocument};
use crate::template::quote::DEFAULT_CLOSING;
use crate::template::{bracket_variables, extract_variables, html_to_text};
use crate::traversal::resolve_start;
use ahash::AHashSet;
use chrono::NaiveDateTime;
use itertools::Itertools;
use std::fmt;
use tracing::{debug, warn};

pub const DEFAULT_DEPTH_LIMIT: usize = 256;
const RULE: &str = "================================================================";
const INDENT: &str = "    ";

/// A formatted, self-contained text rendering of a playbook. Render with `to_string()`.
pub struct DocumentExport<'a> {
    pub document: &'a PlaybookDocument,
    pub name: &'a str,
    pub generated_at: NaiveDateTime,
    /// Ceiling on nested branch levels in the flow walk. Not a semantic limit.
    pub depth_limit: usize,
}

impl<'a> DocumentExport<'a> {
    pub fn new(document: &'a PlaybookDocument, name: &'a str, generated_at: NaiveDateTime) -> Self {
        Self {
            document,
            name,
            generated_at,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// Nodes that cannot be reached from the start node, in document order.
    pub fn orphans(&self) -> Vec<&'a FlowNode> {
        let reached = reachable(self.document);
        self.document
            .nodes
            .iter()
            .filter(|n| !reached.contains(&n.id))
            .collect()
    }

    fn fmt_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.document;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "PLAYBOOK EXPORT: {}", self.name)?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(
            f,
            "Nodes: {} | Connections: {} | Carriers: {}",
            doc.nodes.len(),
            doc.edges.len(),
            doc.carriers.len()
        )?;
        writeln!(f, "{}", RULE)
    }

    fn fmt_call_types(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nCALL TYPES")?;
        for (i, call_type) in self.document.call_types.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, call_type)?;
        }
        Ok(())
    }

    fn fmt_carriers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nCARRIER SCRIPTS")?;
        if self.document.carriers.is_empty() {
            return writeln!(f, "  (no carriers)");
        }
        for carrier in self.document.carriers.values() {
            writeln!(f, "\n  {}", carrier.name)?;
            // Call types in document order first, then any keys the list does not name.
            let ordered = self
                .document
                .call_types
                .iter()
                .filter_map(|t| carrier.scripts.get_key_value(t))
                .chain(
                    carrier
                        .scripts
                        .iter()
                        .filter(|(k, _)| !self.document.call_types.contains(*k)),
                )
                .filter(|(_, html)| !html.trim().is_empty());

            let mut any = false;
            for (call_type, html) in ordered {
                any = true;
                writeln!(f, "    [{}]", call_type)?;
                write_block(f, &html_to_text(html), "      ")?;
            }
            if let Some(legacy) = carrier.legacy_script.as_ref().filter(|s| !s.trim().is_empty()) {
                any = true;
                writeln!(f, "    [All call types]")?;
                write_block(f, &html_to_text(legacy), "      ")?;
            }
            if !any {
                writeln!(f, "    (no scripts)")?;
            }
        }
        Ok(())
    }

    fn fmt_content(&self, f: &mut fmt::Formatter<'_>, node: &FlowNode, pad: &str) -> fmt::Result {
        match &node.data {
            NodeData::Script(data) => {
                writeln!(f, "{}SAY:", pad)?;
                write_block(f, &html_to_text(&data.text), &format!("{}  ", pad))?;
            }
            NodeData::CarrierLookup(data) => {
                let call_type = self.document.resolve_call_type(&data.default_call_type);
                writeln!(f, "{}ACTION: Ask which carrier the customer is calling about and select it.", pad)?;
                writeln!(f, "{}Confirm the call type (default: {}).", pad, call_type)?;
                writeln!(f, "{}Read that carrier's script for the call type (see CARRIER SCRIPTS).", pad)?;
            }
            NodeData::Quote(data) => {
                let closing = data
                    .closing_question
                    .as_deref()
                    .filter(|q| !q.trim().is_empty())
                    .unwrap_or(DEFAULT_CLOSING);
                writeln!(f, "{}QUOTE PRESENTATION:", pad)?;
                writeln!(f, "{}  1. Enter the down payment and the monthly premium.", pad)?;
                writeln!(f, "{}  2. Select policy-level coverages, then coverages for each vehicle.", pad)?;
                writeln!(f, "{}  3. Read the generated quote to the customer.", pad)?;
                writeln!(f, "{}  4. Ask: {}", pad, closing)?;
            }
            NodeData::Checklist(data) => {
                writeln!(f, "{}CHECKLIST:", pad)?;
                for item in ChecklistItem::parse_all(&data.items) {
                    if item.is_yes_no() {
                        writeln!(f, "{}  [ ] {} (Yes / No)", pad, item.text)?;
                    } else {
                        writeln!(f, "{}  [ ] {}", pad, item.text)?;
                    }
                }
            }
            NodeData::WordTrack(data) => {
                writeln!(f, "{}WORD TRACK:", pad)?;
                write_block(f, &bracket_variables(&html_to_text(&data.template)), &format!("{}  ", pad))?;
                let variables = extract_variables(&data.template);
                if !variables.is_empty() {
                    writeln!(f, "{}Fill in: {}", pad, variables.iter().join(", "))?;
                }
            }
        }
        Ok(())
    }

    /// Prints the flow from `id`. Single-edge continuations stay at the same depth; only
    /// branching nests, so `depth` counts branch levels.
    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: &str,
        depth: usize,
        visited: &mut AHashSet<String>,
    ) -> fmt::Result {
        let pad = INDENT.repeat(depth);
        let mut current = id.to_string();
        loop {
            let Some(node) = self.document.node(&current) else {
                warn!(node_id = %current, "export skipped an edge to a missing node");
                return writeln!(f, "{}(missing step '{}')", pad, current);
            };
            if visited.contains(current.as_str()) {
                return writeln!(f, "{}-> continue at \"{}\" (shown above)", pad, node.label());
            }
            if depth >= self.depth_limit {
                warn!(node_id = %current, depth, "export cut the flow at the depth limit");
                return writeln!(f, "{}... (flow continues at \"{}\")", pad, node.label());
            }
            visited.insert(current.clone());

            let start = if node.is_start { " (START)" } else { "" };
            writeln!(f, "{}[{}] {}{}", pad, node.kind().display_name(), node.label(), start)?;
            self.fmt_content(f, node, &format!("{}  ", pad))?;

            let next = {
                let edges: Vec<_> = self.document.outgoing(&current).collect();
                match edges.as_slice() {
                    [] => {
                        writeln!(f, "{}  (end of call)", pad)?;
                        None
                    }
                    [edge] => {
                        writeln!(f, "{}  -> {}", pad, edge.label)?;
                        Some(edge.target.clone())
                    }
                    branches => {
                        for edge in branches {
                            writeln!(f, "{}  OPTION \"{}\":", pad, edge.label)?;
                            self.fmt_node(f, &edge.target, depth + 1, visited)?;
                        }
                        None
                    }
                }
            };
            match next {
                Some(target) => current = target,
                None => return Ok(()),
            }
        }
    }

    fn fmt_flow(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nCALL FLOW")?;
        let Some((start, _)) = resolve_start(self.document) else {
            return writeln!(f, "  (no steps)");
        };
        let mut visited = AHashSet::new();
        self.fmt_node(f, &start.id, 0, &mut visited)?;
        debug!(visited = visited.len(), "exported call flow");
        Ok(())
    }

    fn fmt_orphans(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let orphans = self.orphans();
        if orphans.is_empty() {
            return Ok(());
        }
        writeln!(f, "\nORPHANED STEPS: {} not reachable from the start", orphans.len())?;
        for node in orphans {
            writeln!(f, "  - [{}] {} (id {})", node.kind().display_name(), node.label(), node.id)?;
        }
        Ok(())
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, text: &str, pad: &str) -> fmt::Result {
    for line in text.lines() {
        writeln!(f, "{}{}", pad, line)?;
    }
    Ok(())
}

impl fmt::Display for DocumentExport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_header(f)?;
        self.fmt_call_types(f)?;
        self.fmt_carriers(f)?;
        self.fmt_flow(f)?;
        self.fmt_orphans(f)
    }
}
