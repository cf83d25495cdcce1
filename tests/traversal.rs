//! Tests for the traversal engine: start resolution, transitions, answer capture, history
//! and jumping back.
mod common;
use common::*;
use playbook::answers::ChecklistAnswer;
use playbook::document::{PlaybookDocument, START_NODE_ID};
use playbook::error::TraversalError;
use playbook::traversal::*;

/// Walks the sample playbook from the greeting to the wrap-up through every node type.
fn complete_call(call: &mut Traversal<'_>) {
    call.choose(0).expect("greeting -> carrier");

    call.select_carrier("10").expect("carrier 10 exists");
    call.choose(0).expect("carrier -> compliance");

    call.answers_mut()
        .set_checklist_answer("3", "Verified ID?", Some(ChecklistAnswer::Yes));
    call.answers_mut().toggle_checkbox("3", "Read disclosure");
    call.choose(0).expect("compliance -> pitch");

    call.answers_mut().set_variable("4", "name", "Sam");
    call.choose(0).expect("pitch -> quote");

    let form = call.quote_form_mut();
    form.down_payment = "100".into();
    form.monthly = "85".into();
    call.choose(0).expect("quote -> wrap up");
}

#[cfg(test)]
mod start_tests {
    use super::*;

    #[test]
    fn test_flagged_start_wins() {
        let mut doc = script_graph(&[("a", "A"), ("1", "One"), ("b", "B")], &[]);
        doc.set_start_node("b").unwrap();
        let (node, tier) = resolve_start(&doc).unwrap();
        assert_eq!((node.id.as_str(), tier), ("b", StartTier::Flagged));
    }

    #[test]
    fn test_conventional_id_then_first_node() {
        let mut doc = script_graph(&[("a", "A"), (START_NODE_ID, "One")], &[]);
        doc.nodes[0].is_start = false;
        let (node, tier) = resolve_start(&doc).unwrap();
        assert_eq!((node.id.as_str(), tier), ("1", StartTier::ConventionalId));

        let mut doc = script_graph(&[("a", "A"), ("b", "B")], &[]);
        doc.nodes[0].is_start = false;
        let (node, tier) = resolve_start(&doc).unwrap();
        assert_eq!((node.id.as_str(), tier), ("a", StartTier::FirstNode));

        doc.nodes.clear();
        assert!(resolve_start(&doc).is_none());
        let call = Traversal::new(&doc);
        assert!(call.current_node().is_none());
    }
}

#[cfg(test)]
mod transition_tests {
    use super::*;

    #[test]
    fn test_options_follow_document_order() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        call.choose(0).unwrap();
        call.select_carrier("11").unwrap();
        call.choose(0).unwrap();

        assert_eq!(call.current_id(), Some("3"));
        let options = call.current_options();
        assert_eq!(
            options,
            vec![
                Choice { label: "Interested".into(), target_id: "4".into() },
                Choice { label: "Not interested".into(), target_id: "6".into() },
            ]
        );
    }

    #[test]
    fn test_terminal_node_has_no_options_and_refuses_to_advance() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        complete_call(&mut call);

        assert_eq!(call.current_id(), Some("6"));
        assert!(call.current_options().is_empty());
        assert!(call.is_terminal());
        assert_eq!(
            call.advance("1", "Again"),
            Err(TraversalError::NotAnOption {
                from_id: "6".into(),
                target_id: "1".into()
            })
        );
        assert!(call.choose(0).is_err());
        assert_eq!(call.history().len(), 5);
    }

    #[test]
    fn test_advance_requires_an_edge() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        assert!(matches!(
            call.advance("5", ""),
            Err(TraversalError::NotAnOption { .. })
        ));
        assert_eq!(call.current_id(), Some("1"));
        assert!(call.history().is_empty());
    }

    #[test]
    fn test_blank_choice_label_uses_edge_label() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        call.advance("2", "  ").unwrap();
        assert_eq!(call.history()[0].chosen_label(), "Next");
    }

    #[test]
    fn test_carrier_node_requires_a_selection() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        call.choose(0).unwrap();

        assert!(!call.can_advance());
        assert_eq!(
            call.choose(0),
            Err(TraversalError::CarrierNotSelected { node_id: "2".into() })
        );
        assert_eq!(
            call.select_carrier("99"),
            Err(TraversalError::UnknownCarrier("99".into()))
        );
        call.select_carrier("10").unwrap();
        assert!(call.can_advance());
    }

    #[test]
    fn test_carrier_script_resolution_tiers() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        call.choose(0).unwrap();
        assert!(call.current_carrier_script().is_none());

        call.select_carrier("10").unwrap();
        assert_eq!(call.effective_call_type(), Some("Billing"));
        let script = call.current_carrier_script().unwrap();
        assert_eq!(script.source, ScriptSource::CallType);
        assert_eq!(script.html, "<p>Acme billing</p>");

        // The Quote script is blank, so the legacy script answers.
        call.select_call_type("Quote");
        let script = call.current_carrier_script().unwrap();
        assert_eq!(script.source, ScriptSource::Legacy);
        assert_eq!(script.html, "<p>Acme general</p>");

        call.select_carrier("11").unwrap();
        let script = call.current_carrier_script().unwrap();
        assert_eq!(script.source, ScriptSource::Missing);
        assert_eq!(script.html, MISSING_SCRIPT);
    }

    #[test]
    fn test_invalid_default_call_type_resolves_to_first() {
        let mut doc = sample_playbook();
        if let Some(playbook::document::NodeData::CarrierLookup(data)) =
            doc.node_mut("2").map(|n| &mut n.data)
        {
            data.default_call_type = "Retired".into();
        }
        let mut call = Traversal::new(&doc);
        call.choose(0).unwrap();
        assert_eq!(call.effective_call_type(), Some("Quote"));

        call.select_call_type("Not a call type");
        assert_eq!(call.effective_call_type(), Some("Quote"));
    }

    #[test]
    fn test_selection_is_cleared_after_advancing() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        call.choose(0).unwrap();
        call.select_carrier("10").unwrap();
        call.choose(0).unwrap();
        assert_eq!(call.selection(), &Selection::default());
    }
}

#[cfg(test)]
mod capture_tests {
    use super::*;

    #[test]
    fn test_history_snapshots_each_node_type() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        complete_call(&mut call);

        let history = call.history();
        let visited: Vec<&str> = history.iter().map(|e| e.node().id.as_str()).collect();
        assert_eq!(visited, vec!["1", "2", "3", "4", "5"]);
        let labels: Vec<&str> = history.iter().map(|e| e.chosen_label()).collect();
        assert_eq!(labels, vec!["Next", "Continue", "Interested", "Quote", "Close"]);

        assert!(matches!(history[0].captured(), CapturedAnswers::None));
        match history[1].captured() {
            CapturedAnswers::Carrier { carrier, call_type, script } => {
                assert_eq!(carrier.name, "Acme");
                assert_eq!(call_type, "Billing");
                assert_eq!(script, "<p>Acme billing</p>");
            }
            other => panic!("expected carrier capture, got {:?}", other),
        }
        match history[2].captured() {
            CapturedAnswers::Checklist(answers) => {
                assert_eq!(answers.get("Verified ID?"), Some(&ChecklistAnswer::Yes));
                assert_eq!(answers.get("Read disclosure"), Some(&ChecklistAnswer::Checked));
                assert_eq!(answers.get("Offered paperless"), None);
            }
            other => panic!("expected checklist capture, got {:?}", other),
        }
        match history[3].captured() {
            CapturedAnswers::WordTrack { filled, variables } => {
                assert_eq!(filled, "Hi Sam, your rate is {rate}/month, Sam.");
                assert_eq!(variables.get("name").map(String::as_str), Some("Sam"));
            }
            other => panic!("expected word track capture, got {:?}", other),
        }
        assert!(matches!(history[4].captured(), CapturedAnswers::None));
    }

    #[test]
    fn test_live_previews_at_the_current_node() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        assert!(call.current_word_track().is_none());
        assert!(call.current_quote_script().is_none());

        call.choose(0).unwrap();
        call.select_carrier("10").unwrap();
        call.choose(0).unwrap();
        call.choose(0).unwrap();
        assert_eq!(
            call.current_word_track().as_deref(),
            Some("Hi {name}, your rate is {rate}/month, {name}.")
        );
        call.answers_mut().set_variable("4", "rate", "$85");
        assert_eq!(
            call.current_word_track().as_deref(),
            Some("Hi {name}, your rate is $85/month, {name}.")
        );

        call.choose(0).unwrap();
        assert_eq!(
            call.current_quote_script().as_deref(),
            Some(playbook::template::quote::PRICING_PLACEHOLDER)
        );
        call.quote_form_mut().down_payment = "10".into();
        call.quote_form_mut().monthly = "20".into();
        let script = call.current_quote_script().unwrap();
        assert!(script.contains("<strong>$10 down</strong>"));
        assert!(script.contains("Shall we start today?"));
    }

    #[test]
    fn test_answers_survive_revisits_and_clear_on_reset() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        complete_call(&mut call);

        call.jump_to(2).unwrap();
        assert_eq!(call.current_id(), Some("3"));
        assert_eq!(
            call.answers().checklist_answer("3", "Verified ID?"),
            Some(ChecklistAnswer::Yes)
        );

        call.reset();
        assert_eq!(call.current_id(), Some("1"));
        assert!(call.history().is_empty());
        assert!(call.answers().is_empty());
        assert_eq!(call.selection(), &Selection::default());
    }
}

#[cfg(test)]
mod jump_tests {
    use super::*;

    #[test]
    fn test_jump_discards_later_history() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        complete_call(&mut call);
        assert_eq!(call.history().len(), 5);

        call.jump_to(3).unwrap();
        assert_eq!(call.current_id(), Some("4"));
        assert_eq!(call.history().len(), 3);

        // The next advance lands at index 3, not after the discarded entries.
        call.choose(0).unwrap();
        assert_eq!(call.history().len(), 4);
        assert_eq!(call.history()[3].node().id, "4");
        assert_eq!(call.current_id(), Some("5"));
    }

    #[test]
    fn test_jump_to_carrier_visit_restores_selection() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        complete_call(&mut call);

        call.jump_to(1).unwrap();
        assert_eq!(call.current_id(), Some("2"));
        assert_eq!(call.history().len(), 1);
        assert_eq!(call.selection().carrier_id.as_deref(), Some("10"));
        assert_eq!(call.selection().call_type.as_deref(), Some("Billing"));

        // Re-branching works straight away with the restored carrier.
        call.choose(0).unwrap();
        assert_eq!(call.history().len(), 2);
        assert_eq!(call.history()[1].node().id, "2");
    }

    #[test]
    fn test_jump_restores_carrier_stored_without_an_id() {
        let doc = PlaybookDocument::from_json(
            r#"{
                "nodes": [
                    {"id": "1", "type": "carrierNode", "data": {"label": "Carrier"}},
                    {"id": "2", "type": "scriptNode", "data": {"label": "Done"}}
                ],
                "edges": [{"source": "1", "target": "2"}],
                "carriers": {"acme": {"name": "Acme"}}
            }"#,
        )
        .unwrap();
        let mut call = Traversal::new(&doc);
        call.select_carrier("acme").unwrap();
        call.choose(0).unwrap();

        call.jump_to(0).unwrap();
        assert_eq!(call.selection().carrier_id.as_deref(), Some("acme"));
        call.choose(0).unwrap();
        assert_eq!(call.current_id(), Some("2"));
    }

    #[test]
    fn test_jump_to_other_visit_clears_selection() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        call.choose(0).unwrap();
        call.select_carrier("10").unwrap();

        call.jump_to(0).unwrap();
        assert_eq!(call.current_id(), Some("1"));
        assert!(call.history().is_empty());
        assert_eq!(call.selection(), &Selection::default());
    }

    #[test]
    fn test_jump_out_of_range() {
        let doc = sample_playbook();
        let mut call = Traversal::new(&doc);
        call.choose(0).unwrap();
        assert_eq!(
            call.jump_to(1),
            Err(TraversalError::HistoryIndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(call.current_id(), Some("2"));
    }

    #[test]
    fn test_cycles_can_be_walked_repeatedly() {
        let doc = cyclic_diamond();
        let mut call = Traversal::new(&doc);
        for _ in 0..3 {
            call.choose(1).unwrap();
            call.choose(0).unwrap();
        }
        assert_eq!(call.current_id(), Some("1"));
        assert_eq!(call.history().len(), 6);
    }
}
