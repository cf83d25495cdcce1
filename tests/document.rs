//! Tests for the playbook document model: loading, defaults, persistence shape and editor
//! actions.
mod common;
use common::*;
use playbook::document::*;
use playbook::error::EditError;

#[cfg(test)]
mod loading_tests {
    use super::*;

    #[test]
    fn test_sample_playbook_loads_every_collection() {
        let doc = sample_playbook();

        assert_eq!(doc.nodes.len(), 6);
        assert_eq!(doc.edges.len(), 6);
        assert_eq!(doc.call_types, vec!["Quote", "Billing"]);
        assert_eq!(doc.carriers.len(), 2);
        assert_eq!(doc.node("4").map(|n| n.kind()), Some(NodeKind::WordTrack));
        assert_eq!(doc.node("2").map(|n| n.label()), Some("Carrier"));
        assert!(doc.node("1").is_some_and(|n| n.is_start));

        // Omitted collections fall back to the built-in content.
        assert_eq!(doc.quote_settings, QuoteSettings::default());
        assert_eq!(doc.quote_settings.coverages.len(), 7);
        assert_eq!(doc.resources.len(), 2);
    }

    #[test]
    fn test_numeric_ids_are_normalized_to_strings() {
        let doc = sample_playbook();
        let acme = doc.carrier("10").expect("carrier 10");
        assert_eq!(acme.id, "10");
        assert_eq!(acme.legacy_script.as_deref(), Some("<p>Acme general</p>"));
        assert_eq!(doc.issues[0].id, "1700000000000");
    }

    #[test]
    fn test_resource_types_load_with_text_fallback() {
        let doc = PlaybookDocument::from_json(
            r#"{"resources": [
                {"id": 1, "title": "Portal", "type": "link", "content": "https://example.com"},
                {"id": 2, "title": "Hours", "type": "text", "content": "9 to 5"},
                {"id": 3, "title": "Map", "type": "image", "content": "map.png"},
                {"id": 4, "title": "Notes"}
            ]}"#,
        )
        .expect("resources must load");

        let kinds: Vec<ResourceKind> = doc.resources.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::Link, ResourceKind::Text, ResourceKind::Text, ResourceKind::Text]
        );
        assert_eq!(doc.resources[0].id, "1");

        let saved = doc.to_json().unwrap();
        assert!(saved.contains(r#""type":"link""#) || saved.contains(r#""type": "link""#));
    }

    #[test]
    fn test_carrier_ids_follow_their_keys() {
        let doc = PlaybookDocument::from_json(
            r#"{"carriers": {
                "acme": {"name": "Acme"},
                "zen": {"id": "stale", "name": "Zenith"}
            }}"#,
        )
        .expect("carriers must load");

        assert_eq!(doc.carrier("acme").map(|c| c.id.as_str()), Some("acme"));
        assert_eq!(doc.carrier("zen").map(|c| c.id.as_str()), Some("zen"));
    }

    #[test]
    fn test_empty_object_loads_as_default_document() {
        let doc = PlaybookDocument::from_json("{}").expect("empty object must load");

        assert_eq!(doc.nodes.len(), 1);
        let start = &doc.nodes[0];
        assert_eq!(start.id, START_NODE_ID);
        assert!(start.is_start);
        match &start.data {
            NodeData::Script(data) => {
                assert_eq!(data.label, "Start");
                assert_eq!(data.text, WELCOME_TEXT);
            }
            other => panic!("expected a script node, got {:?}", other),
        }
        assert_eq!(doc.call_types, default_call_types());
        assert_eq!(doc.carriers, default_carriers());
        assert_eq!(doc.resources, default_resources());
        assert!(doc.issues.is_empty());
        assert_eq!(doc, PlaybookDocument::default());
    }

    #[test]
    fn test_empty_nodes_drop_dangling_edges() {
        let json = r#"{"nodes": [], "edges": [{"source": "1", "target": "2"}]}"#;
        let doc = PlaybookDocument::from_json(json).unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert!(doc.edges.is_empty());
    }

    #[test]
    fn test_empty_call_types_are_replaced() {
        let json = r#"{"nodes": [{"id": "1", "type": "scriptNode", "data": {"label": "A"}}], "edges": [], "callTypes": []}"#;
        let doc = PlaybookDocument::from_json(json).unwrap();
        assert_eq!(
            doc.call_types,
            vec!["Quote", "Sale", "Billing", "Service", "Claims", "Other"]
        );
    }

    #[test]
    fn test_unknown_and_alias_node_types() {
        let json = r#"{
            "nodes": [
                {"id": "1", "type": "videoNode", "data": {"label": "Mystery", "text": "<p>?</p>"}},
                {"id": "2", "type": "madLibsNode", "data": {"template": "Hi {name}"}}
            ],
            "edges": []
        }"#;
        let doc = PlaybookDocument::from_json(json).unwrap();

        let mystery = doc.node("1").unwrap();
        assert_eq!(mystery.kind(), NodeKind::Script);
        assert_eq!(mystery.label(), "Mystery");

        let track = doc.node("2").unwrap();
        assert_eq!(track.kind(), NodeKind::WordTrack);
        assert_eq!(track.label(), "Word Track");
    }

    #[test]
    fn test_missing_or_blank_edge_label_defaults_to_next() {
        let json = r#"{
            "nodes": [{"id": "1", "type": "scriptNode", "data": {}}, {"id": "2", "type": "scriptNode", "data": {}}],
            "edges": [
                {"source": "1", "target": "2"},
                {"source": "1", "target": "2", "label": null},
                {"source": "1", "target": "2", "label": "  "},
                {"source": "1", "target": "2", "label": "Yes"}
            ]
        }"#;
        let doc = PlaybookDocument::from_json(json).unwrap();
        let labels: Vec<&str> = doc.edges.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Next", "Next", "Next", "Yes"]);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let result = PlaybookDocument::from_json("{not json");
        assert!(matches!(
            result,
            Err(playbook::error::StoreError::Parse { .. })
        ));
    }
}

#[cfg(test)]
mod persistence_shape_tests {
    use super::*;

    #[test]
    fn test_load_save_load_is_stable() {
        let doc = sample_playbook();
        let json = doc.to_json().expect("serialize");
        let reloaded = PlaybookDocument::from_json(&json).expect("reload");

        assert_eq!(reloaded.nodes, doc.nodes);
        assert_eq!(reloaded.edges, doc.edges);
        assert_eq!(reloaded, doc);

        let again = PlaybookDocument::from_json(&reloaded.to_json().unwrap()).unwrap();
        assert_eq!(again, reloaded);
    }

    #[test]
    fn test_saved_form_uses_editor_field_names() {
        let json = sample_playbook().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nodes"][0]["type"], "scriptNode");
        assert_eq!(value["nodes"][0]["data"]["isStart"], true);
        assert_eq!(value["nodes"][1]["data"]["defaultCallType"], "Billing");
        assert_eq!(value["nodes"][4]["data"]["closingQuestion"], "Shall we start today?");
        assert_eq!(value["carriers"]["10"]["id"], "10");
        assert_eq!(value["carriers"]["10"]["script"], "<p>Acme general</p>");
        assert!(value["callTypes"].is_array());
        assert!(value["quoteSettings"]["coverages"].is_array());
    }

    #[test]
    fn test_runtime_only_fields_are_not_saved() {
        let json = r#"{
            "nodes": [{"id": "1", "type": "scriptNode",
                       "data": {"label": "A", "text": "x", "onChange": "callback", "setAsStartNode": "callback"}}],
            "edges": []
        }"#;
        let mut doc = PlaybookDocument::from_json(json).unwrap();
        doc.set_node_selected("1", true).unwrap();

        let saved = doc.to_json().unwrap();
        assert!(!saved.contains("onChange"));
        assert!(!saved.contains("setAsStartNode"));
        assert!(!saved.contains("selected"));
    }
}

#[cfg(test)]
mod editing_tests {
    use super::*;

    #[test]
    fn test_remove_node_cascades_to_edges() {
        let mut doc = sample_playbook();
        let removed = doc.remove_node("3").expect("node 3 exists");

        assert_eq!(removed.label(), "Compliance");
        assert!(doc.node("3").is_none());
        assert!(doc.edges.iter().all(|e| !e.touches("3")));
        assert_eq!(doc.edges.len(), 3);
        assert_eq!(doc.remove_node("3").unwrap_err(), EditError::NodeNotFound("3".into()));
    }

    #[test]
    fn test_remove_selected_nodes_and_edges() {
        let mut doc = sample_playbook();
        doc.set_node_selected("4", true).unwrap();
        // Edge 1 -> 2.
        doc.set_edge_selected(0, true).unwrap();

        let (nodes, edges) = doc.remove_selected();
        assert_eq!(nodes, 1);
        // 1 -> 2 plus 3 -> 4 and 4 -> 5.
        assert_eq!(edges, 3);
        assert!(doc.edges.iter().all(|e| !e.touches("4")));
        assert!(!doc.edges.iter().any(|e| e.source == "1" && e.target == "2"));
    }

    #[test]
    fn test_add_node_uses_type_defaults_and_unique_ids() {
        let mut doc = sample_playbook();
        let before: Vec<String> = doc.nodes.iter().map(|n| n.id.clone()).collect();

        let checklist = doc.add_node(NodeKind::Checklist);
        let carrier = doc.add_node(NodeKind::CarrierLookup);
        let quote = doc.add_node(NodeKind::Quote);

        assert!(!before.contains(&checklist));
        assert_ne!(checklist, carrier);
        assert_eq!(doc.nodes.len(), 9);

        let node = doc.node(&checklist).unwrap();
        assert_eq!(node.label(), "Compliance Check");
        assert!(!node.is_start);
        match &doc.node(&carrier).unwrap().data {
            NodeData::CarrierLookup(data) => assert_eq!(data.default_call_type, "Quote"),
            other => panic!("expected carrier lookup, got {:?}", other),
        }
        match &doc.node(&quote).unwrap().data {
            NodeData::Quote(data) => {
                assert_eq!(data.closing_question.as_deref(), Some("How does that price sound?"))
            }
            other => panic!("expected quote, got {:?}", other),
        }
    }

    #[test]
    fn test_generated_ids_never_collide() {
        let mut doc = PlaybookDocument::default();
        for _ in 0..200 {
            doc.add_node(NodeKind::Script);
        }
        let mut ids: Vec<&str> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 201);
    }

    #[test]
    fn test_set_start_node_keeps_a_single_flag() {
        let mut doc = sample_playbook();
        doc.set_start_node("3").unwrap();
        let flagged: Vec<&str> = doc
            .nodes
            .iter()
            .filter(|n| n.is_start)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(flagged, vec!["3"]);
        assert!(doc.set_start_node("99").is_err());
    }

    #[test]
    fn test_connect_validates_endpoints_and_defaults_label() {
        let mut doc = sample_playbook();
        let index = doc.connect("6", "1", "   ").unwrap();
        assert_eq!(doc.edges[index].label, DEFAULT_EDGE_LABEL);
        assert_eq!(doc.edges[index].source, "6");

        assert_eq!(
            doc.connect("6", "missing", "Go").unwrap_err(),
            EditError::NodeNotFound("missing".into())
        );
        assert!(doc.remove_edge(index).is_ok());
        assert_eq!(doc.remove_edge(100).unwrap_err(), EditError::EdgeNotFound(100));
    }

    #[test]
    fn test_edge_ids_stay_unique_after_removal() {
        let mut doc = script_graph(&[("1", "One"), ("2", "Two")], &[]);
        let first = doc.connect("1", "2", "a").unwrap();
        doc.connect("1", "2", "b").unwrap();
        doc.remove_edge(first).unwrap();
        doc.connect("1", "2", "c").unwrap();

        let ids: Vec<&str> = doc.edges.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| id.starts_with("e1-2-")));
    }

    #[test]
    fn test_update_node_data_changes_type() {
        let mut doc = sample_playbook();
        doc.update_node_data(
            "6",
            NodeData::Checklist(ChecklistData {
                label: "Final check".into(),
                items: "Confirmed email".into(),
            }),
        )
        .unwrap();
        assert_eq!(doc.node("6").unwrap().kind(), NodeKind::Checklist);
    }

    #[test]
    fn test_carriers_and_call_types() {
        let mut doc = sample_playbook();
        let id = doc.add_carrier("Nimbus");
        assert_eq!(doc.carrier(&id).map(|c| c.name.as_str()), Some("Nimbus"));
        // Insertion order is preserved.
        assert_eq!(doc.carriers.keys().last(), Some(&id));

        doc.remove_carrier("10").unwrap();
        assert!(doc.carrier("10").is_none());
        assert_eq!(doc.remove_carrier("10").unwrap_err(), EditError::CarrierNotFound("10".into()));

        assert_eq!(doc.set_call_types(vec![" ".into()]).unwrap_err(), EditError::EmptyCallTypes);
        doc.set_call_types(vec![" Renewal ".into(), "".into(), "Claims".into()])
            .unwrap();
        assert_eq!(doc.call_types, vec!["Renewal", "Claims"]);
    }

    #[test]
    fn test_resolve_call_type_falls_back_to_first() {
        let doc = sample_playbook();
        assert_eq!(doc.resolve_call_type("Billing"), "Billing");
        assert_eq!(doc.resolve_call_type("Bogus"), "Quote");
    }
}

#[cfg(test)]
mod checklist_and_issue_tests {
    use super::*;

    #[test]
    fn test_checklist_lines_are_classified() {
        let items = ChecklistItem::parse_all(
            "Verified ID? (yes/no)\nRead disclosure\n\n   \nOffered paperless (Yes/No)",
        );
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text, "Verified ID?");
        assert_eq!(items[0].kind, ItemKind::YesNo);
        assert_eq!(items[1].text, "Read disclosure");
        assert_eq!(items[1].kind, ItemKind::Checkbox);
        assert_eq!(items[2].text, "Offered paperless");
        assert!(items[2].is_yes_no());
    }

    #[test]
    fn test_marker_is_removed_wherever_it_appears() {
        let item = ChecklistItem::parse("(YES/NO) Customer agreed to terms").unwrap();
        assert_eq!(item.text, "Customer agreed to terms");
        assert_eq!(item.kind, ItemKind::YesNo);
        assert!(ChecklistItem::parse("  ").is_none());
    }

    #[test]
    fn test_issue_search_matches_all_terms() {
        let doc = sample_playbook();
        assert_eq!(doc.search_issues("card").count(), 1);
        assert_eq!(doc.search_issues("BILLING payment").count(), 1);
        assert_eq!(doc.search_issues("refund").count(), 0);
        assert_eq!(doc.search_issues("").count(), 1);
    }
}
