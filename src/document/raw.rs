//! The persisted JSON shape of a playbook, as written by the flow editor.
//!
//! Every top-level collection is optional here; conversion into
//! [`PlaybookDocument`] fills in defaults so partial documents never fail to load.

use super::defaults;
use super::model::*;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// Accepts ids written either as strings or as numbers (the editor used timestamps).
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_call_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: RawNodeData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlaybook {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carriers: Option<IndexMap<String, Carrier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_settings: Option<QuoteSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl From<RawNode> for FlowNode {
    fn from(raw: RawNode) -> Self {
        let kind = NodeKind::from_tag(&raw.kind).unwrap_or_else(|| {
            warn!(node_id = %raw.id, tag = %raw.kind, "unknown node type, loading as script");
            NodeKind::Script
        });
        let d = raw.data;
        let label = d
            .label
            .unwrap_or_else(|| defaults::default_label(kind).to_string());
        let data = match kind {
            NodeKind::Script => NodeData::Script(ScriptData {
                label,
                text: d.text.unwrap_or_default(),
            }),
            NodeKind::CarrierLookup => NodeData::CarrierLookup(CarrierLookupData {
                label,
                default_call_type: d.default_call_type.unwrap_or_default(),
            }),
            NodeKind::Quote => NodeData::Quote(QuoteData {
                label,
                closing_question: d.closing_question,
            }),
            NodeKind::Checklist => NodeData::Checklist(ChecklistData {
                label,
                items: d.items.unwrap_or_default(),
            }),
            NodeKind::WordTrack => NodeData::WordTrack(WordTrackData {
                label,
                template: d.template.unwrap_or_default(),
            }),
        };
        FlowNode {
            id: raw.id,
            position: raw.position,
            is_start: d.is_start,
            data,
            selected: false,
        }
    }
}

impl From<&FlowNode> for RawNode {
    fn from(node: &FlowNode) -> Self {
        let mut data = RawNodeData {
            label: Some(node.label().to_string()),
            is_start: node.is_start,
            ..RawNodeData::default()
        };
        match &node.data {
            NodeData::Script(d) => data.text = Some(d.text.clone()),
            NodeData::CarrierLookup(d) => {
                data.default_call_type = Some(d.default_call_type.clone())
            }
            NodeData::Quote(d) => data.closing_question = d.closing_question.clone(),
            NodeData::Checklist(d) => data.items = Some(d.items.clone()),
            NodeData::WordTrack(d) => data.template = Some(d.template.clone()),
        }
        RawNode {
            id: node.id.clone(),
            kind: node.kind().tag().to_string(),
            position: node.position,
            data,
        }
    }
}

impl From<RawPlaybook> for PlaybookDocument {
    fn from(raw: RawPlaybook) -> Self {
        let (nodes, edges) = if raw.nodes.is_empty() {
            (
                vec![defaults::start_node(defaults::WELCOME_TEXT)],
                Vec::new(),
            )
        } else {
            (raw.nodes.into_iter().map(FlowNode::from).collect(), raw.edges)
        };

        let call_types = raw
            .call_types
            .filter(|types| !types.is_empty())
            .unwrap_or_else(defaults::default_call_types);

        PlaybookDocument {
            nodes,
            edges,
            carriers: raw
                .carriers
                .map(key_carriers)
                .unwrap_or_else(defaults::default_carriers),
            call_types,
            quote_settings: raw.quote_settings.unwrap_or_default(),
            resources: raw.resources.unwrap_or_else(defaults::default_resources),
            issues: raw.issues.unwrap_or_default(),
            filename: raw.filename,
        }
    }
}

/// Lookups go by map key, so a carrier's own id is made to agree with it.
fn key_carriers(mut carriers: IndexMap<String, Carrier>) -> IndexMap<String, Carrier> {
    for (key, carrier) in carriers.iter_mut() {
        if carrier.id != *key {
            debug!(key = %key, stored_id = %carrier.id, "carrier id replaced by its key");
            carrier.id = key.clone();
        }
    }
    carriers
}

impl From<PlaybookDocument> for RawPlaybook {
    fn from(doc: PlaybookDocument) -> Self {
        RawPlaybook {
            nodes: doc.nodes.iter().map(RawNode::from).collect(),
            edges: doc.edges,
            carriers: Some(doc.carriers),
            call_types: Some(doc.call_types),
            quote_settings: Some(doc.quote_settings),
            resources: Some(doc.resources),
            issues: Some(doc.issues),
            filename: doc.filename,
        }
    }
}
