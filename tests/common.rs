//! Common test utilities for building playbooks.
use chrono::{NaiveDate, NaiveDateTime};
use playbook::document::{FlowEdge, FlowNode, NodeData, PlaybookDocument, ScriptData};

/// A six-step playbook touching every node type.
///
/// `1 Greeting -> 2 Carrier -> 3 Compliance -> {4 Pitch -> 5 Quote, 6 Wrap up}`, with
/// `5 -> 6`. Carrier `10` has a numeric id on disk, a Billing script, a blank Quote script
/// and a legacy script; carrier `11` has no scripts at all. Quote settings and resources
/// are omitted so they load as defaults.
#[allow(dead_code)]
pub const SAMPLE_PLAYBOOK_JSON: &str = r#"{
    "nodes": [
        {"id": "1", "type": "scriptNode", "position": {"x": 0, "y": 0},
         "data": {"label": "Greeting", "isStart": true, "text": "<p>Hello, thanks for calling.</p>"}},
        {"id": "2", "type": "carrierNode", "position": {"x": 10, "y": 0},
         "data": {"label": "Carrier", "defaultCallType": "Billing"}},
        {"id": "3", "type": "checklistNode", "position": {"x": 20, "y": 0},
         "data": {"label": "Compliance", "items": "Verified ID? (yes/no)\nRead disclosure\n\nOffered paperless (Yes/No)"}},
        {"id": "4", "type": "wordTrackNode", "position": {"x": 30, "y": 0},
         "data": {"label": "Pitch", "template": "Hi {name}, your rate is {rate}/month, {name}."}},
        {"id": "5", "type": "quoteNode", "position": {"x": 40, "y": 0},
         "data": {"label": "Quote", "closingQuestion": "Shall we start today?"}},
        {"id": "6", "type": "scriptNode", "position": {"x": 50, "y": 0},
         "data": {"label": "Wrap up", "text": "<p>Thanks, goodbye.</p>"}}
    ],
    "edges": [
        {"id": "e1", "source": "1", "target": "2", "label": "Next"},
        {"id": "e2", "source": "2", "target": "3", "label": "Continue"},
        {"id": "e3", "source": "3", "target": "4", "label": "Interested"},
        {"id": "e4", "source": "3", "target": "6", "label": "Not interested"},
        {"id": "e5", "source": "4", "target": "5", "label": "Quote"},
        {"id": "e6", "source": "5", "target": "6", "label": "Close"}
    ],
    "carriers": {
        "10": {"id": 10, "name": "Acme",
               "scripts": {"Billing": "<p>Acme billing</p>", "Quote": "   "},
               "script": "<p>Acme general</p>"},
        "11": {"id": "11", "name": "Zenith", "scripts": {}}
    },
    "callTypes": ["Quote", "Billing"],
    "issues": [
        {"id": 1700000000000, "title": "Payment failed", "category": "Billing",
         "solution": "Retry with another card.", "keywords": "card declined autopay"}
    ]
}"#;

#[allow(dead_code)]
pub fn sample_playbook() -> PlaybookDocument {
    PlaybookDocument::from_json(SAMPLE_PLAYBOOK_JSON).expect("sample playbook must parse")
}

/// A plain script node.
#[allow(dead_code)]
pub fn script(id: &str, label: &str) -> FlowNode {
    FlowNode::new(
        id,
        NodeData::Script(ScriptData {
            label: label.to_string(),
            text: format!("<p>{} text</p>", label),
        }),
    )
}

/// A document made of script nodes and `(source, target, label)` edges. The first node is
/// flagged as the start.
#[allow(dead_code)]
pub fn script_graph(nodes: &[(&str, &str)], edges: &[(&str, &str, &str)]) -> PlaybookDocument {
    let mut document = PlaybookDocument::default();
    document.nodes = nodes.iter().map(|(id, label)| script(id, label)).collect();
    if let Some(first) = document.nodes.first_mut() {
        first.is_start = true;
    }
    document.edges = edges
        .iter()
        .map(|(source, target, label)| FlowEdge::new(*source, *target, label))
        .collect();
    document
}

/// `One -> {Two, Three}`, `Two -> Three`, and a cycle back from `Three` to `One`.
#[allow(dead_code)]
pub fn cyclic_diamond() -> PlaybookDocument {
    script_graph(
        &[("1", "One"), ("2", "Two"), ("3", "Three")],
        &[
            ("1", "2", "Left"),
            ("1", "3", "Right"),
            ("2", "3", "Next"),
            ("3", "1", "Loop"),
        ],
    )
}

#[allow(dead_code)]
pub fn fixed_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}
