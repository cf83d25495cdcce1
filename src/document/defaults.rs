//! Built-in content used when a playbook omits a collection, and for newly created nodes.

use super::model::*;
use indexmap::IndexMap;

pub const START_NODE_ID: &str = "1";
pub const DEFAULT_EDGE_LABEL: &str = "Next";
pub const WELCOME_TEXT: &str = "Welcome to the Insurance Wizard";
pub const LOAD_ERROR_TEXT: &str = "Error loading file. Resetting...";

pub const DEFAULT_COVERAGE_FORMAT: &str = "<b>{label}</b> with {value}";
pub const DEFAULT_VEHICLE_TEMPLATE: &str = "for {name}, we have {coverages}";
pub const DEFAULT_QUOTE_TEMPLATE: &str = "<p>Excellent news, I found a great rate with <strong>{carrier}</strong>.</p><p>{policy}</p><p>Then {vehicles}.</p><p>I will get this started today for <strong>{down} down</strong> and <strong>{monthly} a month</strong>.</p><p>{closing}</p>";

pub fn default_call_types() -> Vec<String> {
    ["Quote", "Sale", "Billing", "Service", "Claims", "Other"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_carriers() -> IndexMap<String, Carrier> {
    let progressive = Carrier {
        id: "1".to_string(),
        name: "Progressive".to_string(),
        scripts: IndexMap::new(),
        legacy_script: Some(
            "<p>Verify garaging address matches license.</p><p><strong>Phone:</strong> 1-800-776-4737</p>"
                .to_string(),
        ),
    };
    IndexMap::from([(progressive.id.clone(), progressive)])
}

pub fn default_resources() -> Vec<Resource> {
    vec![
        Resource {
            id: "1".to_string(),
            title: "Callback Script".to_string(),
            kind: ResourceKind::Text,
            content: "<p>Hi, this is [Name] from Jerry.</p><p>I was working on your quote...</p>"
                .to_string(),
        },
        Resource {
            id: "2".to_string(),
            title: "Carrier Matrix".to_string(),
            kind: ResourceKind::Link,
            content: "https://google.com".to_string(),
        },
    ]
}

fn coverage(
    id: &str,
    label: &str,
    placeholder: Option<&str>,
    is_policy_level: bool,
    format: &str,
) -> CoverageField {
    CoverageField {
        id: id.to_string(),
        label: label.to_string(),
        has_input: placeholder.is_some(),
        placeholder: placeholder.map(String::from),
        is_policy_level,
        format: Some(format.to_string()),
    }
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            coverages: vec![
                coverage("bi_pd", "Bodily Injury Liability", Some("e.g. 100/300"), true, "<b>{label}</b> at {value}"),
                coverage("uim", "Uninsured Motorist", Some("e.g. 30/60"), true, "<b>{label}</b> at {value}"),
                coverage("pip", "PIP", None, true, "standard <b>{label}</b>"),
                coverage("towing", "Roadside", None, true, "<b>{label}</b>"),
                coverage("comp", "Comprehensive", Some("e.g. $500 Ded"), false, "<b>{label}</b> with a {value}"),
                coverage("coll", "Collision", Some("e.g. $500 Ded"), false, "<b>{label}</b> with a {value}"),
                coverage("rental", "Rental", Some("e.g. $1200"), false, "{value} for <b>{label}</b>"),
            ],
            coverage_format: Some(DEFAULT_COVERAGE_FORMAT.to_string()),
            vehicle_template: DEFAULT_VEHICLE_TEMPLATE.to_string(),
            template: DEFAULT_QUOTE_TEMPLATE.to_string(),
        }
    }
}

/// The single start node substituted into an empty or unreadable playbook.
pub fn start_node(text: &str) -> FlowNode {
    FlowNode {
        id: START_NODE_ID.to_string(),
        position: Position::new(250.0, 150.0),
        is_start: true,
        data: NodeData::Script(ScriptData {
            label: "Start".to_string(),
            text: text.to_string(),
        }),
        selected: false,
    }
}

pub fn default_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Script => "Step",
        NodeKind::CarrierLookup => "Select Carrier",
        NodeKind::Quote => "Present Quote",
        NodeKind::Checklist => "Compliance Check",
        NodeKind::WordTrack => "Word Track",
    }
}

/// Payload for a node freshly added by the editor.
pub fn default_node_data(kind: NodeKind, call_types: &[String]) -> NodeData {
    let label = default_label(kind).to_string();
    match kind {
        NodeKind::Script => NodeData::Script(ScriptData {
            label,
            text: String::new(),
        }),
        NodeKind::CarrierLookup => NodeData::CarrierLookup(CarrierLookupData {
            label,
            default_call_type: call_types.first().cloned().unwrap_or_default(),
        }),
        NodeKind::Quote => NodeData::Quote(QuoteData {
            label,
            closing_question: Some("How does that price sound?".to_string()),
        }),
        NodeKind::Checklist => NodeData::Checklist(ChecklistData {
            label,
            items: "Did you disclose the TCPA? (yes/no)\nDid you verify date of birth?".to_string(),
        }),
        NodeKind::WordTrack => NodeData::WordTrack(WordTrackData {
            label,
            template: "Thanks {customer_name}! I see you're currently insured with {current_carrier}."
                .to_string(),
        }),
    }
}

impl Default for PlaybookDocument {
    fn default() -> Self {
        PlaybookDocument::placeholder(WELCOME_TEXT)
    }
}

impl PlaybookDocument {
    /// A well-formed single-node document whose start node shows `text`.
    pub fn placeholder(text: &str) -> Self {
        Self {
            nodes: vec![start_node(text)],
            edges: Vec::new(),
            carriers: default_carriers(),
            call_types: default_call_types(),
            quote_settings: QuoteSettings::default(),
            resources: default_resources(),
            issues: Vec::new(),
            filename: None,
        }
    }
}
