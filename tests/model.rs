//! Tests for the data model, the import boundary and error reporting.
mod common;
use common::*;
use kumitate::prelude::*;
use serde_json::json;

#[test]
fn test_step_path_display() {
    assert_eq!(StepPath::top_level(3).to_string(), "steps.3");
    let path = StepPath::top_level(1).child(0, 2).child(1, 0);
    assert_eq!(path.to_string(), "steps.1.branches.0.steps.2.branches.1.steps.0");
    assert_eq!(path.depth(), 2);
    assert_eq!(path.parent().unwrap().to_string(), "steps.1.branches.0.steps.2");
    assert_eq!(StepPath::top_level(1).parent(), None);
}

#[test]
fn test_error_messages() {
    let err = EditError::InvalidIndex { index: 4, len: 2 };
    assert_eq!(
        err.to_string(),
        "Index 4 is out of range for a sequence of 2 steps"
    );

    let state = state_with(vec![choice("choice", vec![vec![]])]);
    let replacement = Step::transform("choice")
        .with_branches(BranchConstraints::new(1, None), vec![])
        .unwrap();
    let err = mutator::delete_in_branch(&state, replacement, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Step 'choice-0' allows between 1 and unbounded branches, but the edit would leave 0"
    );

    let err: ImportError = EditError::UnresolvableIdentifier("x-0".to_string()).into();
    assert_eq!(
        err.to_string(),
        "Imported integration is invalid: No step with identifier 'x-0' exists in the current tree"
    );
}

#[test]
fn test_unbounded_max_branches_round_trips_as_minus_one() {
    let value = json!({
        "type": "transform",
        "name": "choice",
        "minBranches": 1,
        "maxBranches": -1,
        "branches": [ { "steps": [] } ]
    });
    let step: Step = serde_json::from_value(value).unwrap();
    assert_eq!(step.branch_constraints(), BranchConstraints::new(1, None));

    let out = serde_json::to_value(&step).unwrap();
    assert_eq!(out["maxBranches"], json!(-1));
    assert_eq!(out["minBranches"], json!(1));
}

#[test]
fn test_legacy_kind_names_are_accepted() {
    let step: Step =
        serde_json::from_value(json!({ "kind": "START", "name": "timer" })).unwrap();
    assert_eq!(step.kind(), StepKind::Source);
    assert_eq!(step.kind().to_string(), "source");
}

#[test]
fn test_incoming_identifiers_are_ignored() {
    let patch = json!({
        "steps": [ { "UUID": "forged-id", "type": "sink", "name": "out" } ]
    })
    .into_integration()
    .unwrap();
    let state = mutator::bulk_replace(&IntegrationState::default(), patch).unwrap();
    assert_eq!(state.steps()[0].identifier(), "out-0");
}

#[test]
fn test_export_carries_identifiers_and_params() {
    let mut editor = Editor::default();
    editor
        .import(r#"{ "dsl": "Camel", "params": [ { "id": "retries", "value": 3 } ] }"#)
        .unwrap();
    editor
        .append(Step::source("timer").with_parameter("period", 500))
        .unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&editor.integration().to_json().unwrap()).unwrap();
    assert_eq!(exported["dsl"], json!("Camel"));
    assert_eq!(exported["params"][0]["id"], json!("retries"));
    assert_eq!(exported["steps"][0]["UUID"], json!("timer-0"));
    assert_eq!(exported["steps"][0]["parameters"][0]["value"], json!(500));
}

#[test]
fn test_subtree_len_and_step_count() {
    let state = create_nested_state();
    assert_eq!(state.steps()[1].subtree_len(), 5);
    assert_eq!(state.integration().step_count(), 7);
}

#[test]
fn test_with_branches_rejects_too_many() {
    let err = Step::transform("split")
        .with_branches(
            BranchConstraints::new(0, Some(1)),
            vec![Branch::empty(), Branch::empty()],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::BranchConstraintViolation { found: 2, .. }
    ));
}

#[test]
fn test_negative_max_branches_other_than_minus_one_is_rejected() {
    let err = json!({
        "steps": [ { "type": "transform", "name": "split", "maxBranches": -7 } ]
    })
    .into_integration()
    .unwrap_err();
    assert!(matches!(err, ImportError::JsonParseError(ref message) if message.contains("-7")));

    let step: Step =
        serde_json::from_value(json!({ "type": "transform", "name": "split" })).unwrap();
    assert_eq!(step.branch_constraints().max_branches, None);
}
