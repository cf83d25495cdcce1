use super::raw::{RawPlaybook, id_string};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Editor canvas coordinates. Carried through load/save but never read by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The type tag of a flow node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Script,
    CarrierLookup,
    Quote,
    Checklist,
    WordTrack,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Script,
        NodeKind::CarrierLookup,
        NodeKind::Quote,
        NodeKind::Checklist,
        NodeKind::WordTrack,
    ];

    /// The `type` tag used by the persisted JSON format.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Script => "scriptNode",
            NodeKind::CarrierLookup => "carrierNode",
            NodeKind::Quote => "quoteNode",
            NodeKind::Checklist => "checklistNode",
            NodeKind::WordTrack => "wordTrackNode",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "scriptNode" => Some(NodeKind::Script),
            "carrierNode" => Some(NodeKind::CarrierLookup),
            "quoteNode" => Some(NodeKind::Quote),
            "checklistNode" => Some(NodeKind::Checklist),
            "wordTrackNode" | "madLibsNode" => Some(NodeKind::WordTrack),
            _ => None,
        }
    }

    /// Human-readable name used in exports.
    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::Script => "Script",
            NodeKind::CarrierLookup => "Carrier Lookup",
            NodeKind::Quote => "Quote",
            NodeKind::Checklist => "Checklist",
            NodeKind::WordTrack => "Word Track",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptData {
    pub label: String,
    /// HTML produced by the rich-text editor.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CarrierLookupData {
    pub label: String,
    /// Preselected call type; resolved against the document's call types on use.
    pub default_call_type: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuoteData {
    pub label: String,
    pub closing_question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChecklistData {
    pub label: String,
    /// Newline-delimited items; see [`super::ChecklistItem`].
    pub items: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordTrackData {
    pub label: String,
    /// Text with `{variable}` placeholders.
    pub template: String,
}

/// The type-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Script(ScriptData),
    CarrierLookup(CarrierLookupData),
    Quote(QuoteData),
    Checklist(ChecklistData),
    WordTrack(WordTrackData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Script(_) => NodeKind::Script,
            NodeData::CarrierLookup(_) => NodeKind::CarrierLookup,
            NodeData::Quote(_) => NodeKind::Quote,
            NodeData::Checklist(_) => NodeKind::Checklist,
            NodeData::WordTrack(_) => NodeKind::WordTrack,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeData::Script(d) => &d.label,
            NodeData::CarrierLookup(d) => &d.label,
            NodeData::Quote(d) => &d.label,
            NodeData::Checklist(d) => &d.label,
            NodeData::WordTrack(d) => &d.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub id: String,
    pub position: Position,
    pub is_start: bool,
    pub data: NodeData,
    /// Editor selection state. Runtime-only, never persisted.
    pub selected: bool,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            is_start: false,
            data,
            selected: false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }
}

fn default_edge_label() -> String {
    super::DEFAULT_EDGE_LABEL.to_string()
}

/// A labelled transition between two nodes. The label is the option text shown to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default = "default_edge_label", deserialize_with = "label_or_default")]
    pub label: String,
    #[serde(skip)]
    pub selected: bool,
}

fn label_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(default_edge_label))
}

impl FlowEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, label: &str) -> Self {
        let label = if label.trim().is_empty() {
            default_edge_label()
        } else {
            label.to_string()
        };
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            label,
            selected: false,
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// One HTML script per call type. May be sparse.
    #[serde(default)]
    pub scripts: IndexMap<String, String>,
    /// Single script stored by older playbooks, used when `scripts` has no entry.
    #[serde(default, rename = "script", skip_serializing_if = "Option::is_none")]
    pub legacy_script: Option<String>,
}

/// Describes one selectable coverage in the quote builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageField {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub has_input: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Policy-level coverages apply once per quote; the rest apply per vehicle.
    #[serde(default)]
    pub is_policy_level: bool,
    /// Phrase template using `{label}` and `{value}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSettings {
    pub coverages: Vec<CoverageField>,
    pub coverage_format: Option<String>,
    pub vehicle_template: String,
    pub template: String,
}

impl QuoteSettings {
    pub fn coverage(&self, id: &str) -> Option<&CoverageField> {
        self.coverages.iter().find(|c| c.id == id)
    }

    pub fn policy_fields(&self) -> impl Iterator<Item = &CoverageField> {
        self.coverages.iter().filter(|c| c.is_policy_level)
    }

    pub fn vehicle_fields(&self) -> impl Iterator<Item = &CoverageField> {
        self.coverages.iter().filter(|c| !c.is_policy_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Link,
    /// Also what any unrecognized type loads as.
    #[default]
    #[serde(other)]
    Text,
}

/// A reference card shown in the lookup sidebar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: ResourceKind,
    #[serde(default)]
    pub content: String,
}

/// A known problem with its resolution, searchable by keywords.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub keywords: String,
}

impl Issue {
    /// Case-insensitive match of every whitespace-separated query term against the
    /// title, category and keywords. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let haystack = format!("{} {} {}", self.title, self.category, self.keywords).to_lowercase();
        query
            .split_whitespace()
            .all(|term| haystack.contains(&term.to_lowercase()))
    }
}

/// The unit of persistence: one named call-flow playbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlaybook", into = "RawPlaybook")]
pub struct PlaybookDocument {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub carriers: IndexMap<String, Carrier>,
    /// Never empty once loaded.
    pub call_types: Vec<String>,
    pub quote_settings: QuoteSettings,
    pub resources: Vec<Resource>,
    pub issues: Vec<Issue>,
    pub filename: Option<String>,
}
