//! Breadth-first auto-layout: columns by distance from the start node, rows by discovery order.

use crate::document::{PlaybookDocument, Position};
use crate::traversal::resolve_start;
use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpacing {
    /// Horizontal distance between levels.
    pub column: f64,
    /// Vertical distance between nodes of one level.
    pub row: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            column: 350.0,
            row: 150.0,
            origin_x: 50.0,
            origin_y: 50.0,
        }
    }
}

/// BFS coordinates of a node reached from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    /// Distance from the start node.
    pub level: usize,
    /// Order of first discovery within the level.
    pub index: usize,
}

/// Ranks every node reachable from the start node, in discovery order.
pub fn rank_nodes(document: &PlaybookDocument) -> IndexMap<String, Rank> {
    let mut ranks: IndexMap<String, Rank> = IndexMap::new();
    let Some((start, _)) = resolve_start(document) else {
        return ranks;
    };

    let mut per_level: Vec<usize> = vec![1];
    ranks.insert(start.id.clone(), Rank { level: 0, index: 0 });
    let mut queue = VecDeque::from([(start.id.as_str(), 0usize)]);

    while let Some((id, level)) = queue.pop_front() {
        for edge in document.outgoing(id) {
            if ranks.contains_key(&edge.target) {
                continue;
            }
            if document.node(&edge.target).is_none() {
                warn!(source = %id, target = %edge.target, "edge points at a missing node");
                continue;
            }
            let next = level + 1;
            if per_level.len() <= next {
                per_level.push(0);
            }
            let index = per_level[next];
            per_level[next] += 1;
            ranks.insert(edge.target.clone(), Rank { level: next, index });
            queue.push_back((edge.target.as_str(), next));
        }
    }
    ranks
}

/// Ids of nodes reachable from the start node.
pub fn reachable(document: &PlaybookDocument) -> AHashSet<String> {
    rank_nodes(document).into_keys().collect()
}

/// Computed positions. Reached nodes keep discovery order; orphans keep document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub ranked: IndexMap<String, (Rank, Position)>,
    pub orphans: IndexMap<String, Position>,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Position> {
        self.ranked
            .get(id)
            .map(|(_, p)| *p)
            .or_else(|| self.orphans.get(id).copied())
    }
}

/// Lays out the graph without modifying it.
///
/// Orphans (unreachable from the start) form one left-aligned row below the tallest level.
pub fn auto_layout(document: &PlaybookDocument, spacing: &LayoutSpacing) -> Layout {
    let ranks = rank_nodes(document);
    let rows = ranks.values().map(|r| r.index + 1).max().unwrap_or(0);

    let ranked = ranks
        .into_iter()
        .map(|(id, rank)| {
            let position = Position::new(
                spacing.origin_x + rank.level as f64 * spacing.column,
                spacing.origin_y + rank.index as f64 * spacing.row,
            );
            (id, (rank, position))
        })
        .collect::<IndexMap<_, _>>();

    let orphan_y = spacing.origin_y + (rows + 1) as f64 * spacing.row;
    let orphans = document
        .nodes
        .iter()
        .filter(|n| !ranked.contains_key(&n.id))
        .enumerate()
        .map(|(i, n)| {
            let position = Position::new(spacing.origin_x + i as f64 * spacing.column, orphan_y);
            (n.id.clone(), position)
        })
        .collect::<IndexMap<_, _>>();

    debug!(ranked = ranked.len(), orphans = orphans.len(), "computed auto-layout");
    Layout { ranked, orphans }
}

impl PlaybookDocument {
    /// Rewrites every node position from [`auto_layout`]. Topology is untouched.
    pub fn apply_layout(&mut self, spacing: &LayoutSpacing) -> Layout {
        let layout = auto_layout(self, spacing);
        for node in &mut self.nodes {
            if let Some(position) = layout.position(&node.id) {
                node.position = position;
            }
        }
        layout
    }
}
