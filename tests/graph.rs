//! Tests for the graph projection and layout scheduling.
mod common;
use common::*;
use kumitate::graph::LayoutRequest;
use kumitate::prelude::*;
use std::result::Result;
use std::cell::Cell;
use std::collections::HashSet;

#[test]
fn test_one_node_per_step_in_depth_first_order() {
    let state = create_nested_state();
    let graph = build_graph(state.steps());

    let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.clone()).collect();
    assert_eq!(ids, all_identifiers(state.steps()));
    assert_eq!(graph.placeholders().count(), 0);

    let marshal = graph.node("choice-1_b1_inner-0_b0_marshal-0").unwrap();
    assert_eq!(marshal.depth, 2);
    let info = marshal.branch_info.as_ref().unwrap();
    assert_eq!(info.parent_identifier, "choice-1_b1_inner-0");
    assert!(info.is_first);

    let log = graph.node("choice-1_b0_log-1").unwrap();
    assert!(!log.is_branch_entry());
    assert!(graph.node("timer-0").unwrap().branch_info.is_none());
}

#[test]
fn test_edges_for_nested_tree() {
    let state = create_nested_state();
    let graph = build_graph(state.steps());

    let sequential: Vec<_> = graph
        .edges_of_kind(EdgeKind::Sequential)
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(
        sequential,
        vec![
            ("timer-0", "choice-1"),
            ("choice-1", "sink-2"),
            ("choice-1_b0_filter-0", "choice-1_b0_log-1"),
        ]
    );

    let entries: Vec<_> = graph
        .edges_of_kind(EdgeKind::BranchEntry)
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("choice-1", "choice-1_b0_filter-0"),
            ("choice-1", "choice-1_b1_inner-0"),
            ("choice-1_b1_inner-0", "choice-1_b1_inner-0_b0_marshal-0"),
        ]
    );

    let merges: Vec<_> = graph
        .edges_of_kind(EdgeKind::InsertAffordance)
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(
        merges,
        vec![
            ("choice-1_b0_log-1", "sink-2"),
            ("choice-1_b1_inner-0", "sink-2"),
        ]
    );
}

#[test]
fn test_placeholders_fill_missing_branch_slots() {
    let wants_two = Step::transform("split")
        .with_branches(BranchConstraints::new(2, Some(4)), vec![])
        .unwrap();
    let state = state_with(vec![wants_two]);
    let graph = build_graph(state.steps());

    let placeholders: Vec<_> = graph.placeholders().map(|n| n.id.as_str()).collect();
    assert_eq!(
        placeholders,
        vec!["split-0_b0-placeholder", "split-0_b1-placeholder"]
    );
    let entries = graph.edges_of_kind(EdgeKind::BranchEntry).count();
    assert_eq!(entries, 2);
    assert_eq!(graph.edges_of_kind(EdgeKind::InsertAffordance).count(), 0);
}

#[test]
fn test_empty_branch_placeholder_links_to_next_step() {
    let state = state_with(vec![
        choice("choice", vec![vec![Step::transform("a")], vec![]]),
        Step::sink("end"),
    ]);
    let graph = build_graph(state.steps());

    assert!(graph.edges.contains(&VisualizationEdge::new(
        "choice-0",
        "choice-0_b1-placeholder",
        EdgeKind::BranchEntry
    )));
    assert!(graph.edges.contains(&VisualizationEdge::new(
        "choice-0_b1-placeholder",
        "end-1",
        EdgeKind::InsertAffordance
    )));
}

#[test]
fn test_build_graph_is_pure() {
    let state = create_nested_state();
    let first = build_graph(state.steps());
    let second = build_graph(state.steps());
    assert_eq!(first, second);

    let first_edges: HashSet<_> = first.edges.into_iter().collect();
    let second_edges: HashSet<_> = second.edges.into_iter().collect();
    assert_eq!(first_edges, second_edges);
}

#[test]
fn test_empty_tree_projects_to_empty_graph() {
    let graph = build_graph(&[]);
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

/// Fails on demand, otherwise behaves like the layered layout.
struct FlakyLayout {
    fail: Cell<bool>,
}

impl LayoutEngine for FlakyLayout {
    async fn layout(&self, request: LayoutRequest) -> Result<VisualizationGraph, LayoutError> {
        if self.fail.get() {
            Err(LayoutError::LayoutFailure("engine unavailable".to_string()))
        } else {
            Ok(LayeredLayout::default().arrange(request))
        }
    }
}

#[test]
fn test_layout_failure_keeps_previous_rendering() {
    let engine = FlakyLayout {
        fail: Cell::new(false),
    };
    let mut coordinator = LayoutCoordinator::new(LayoutMode::Horizontal);
    let state = create_nested_state();

    let outcome = tokio_test::block_on(coordinator.run(&engine, build_graph(state.steps())));
    assert_eq!(outcome, LayoutOutcome::Applied);
    let rendered = coordinator.rendered().unwrap().clone();
    assert!(rendered.nodes.iter().all(|n| n.position.is_some()));

    engine.fail.set(true);
    let outcome = tokio_test::block_on(coordinator.run(&engine, build_graph(&[])));
    assert_eq!(outcome, LayoutOutcome::Failed);
    assert_eq!(coordinator.rendered(), Some(&rendered));
}

#[test]
fn test_stale_layout_results_are_discarded() {
    let mut coordinator = LayoutCoordinator::default();
    let old_state = state_with(vec![Step::source("a")]);
    let new_state = state_with(vec![Step::source("a"), Step::sink("b")]);

    let (old_ticket, old_request) = coordinator.submit(build_graph(old_state.steps()));
    let (new_ticket, new_request) = coordinator.submit(build_graph(new_state.steps()));

    let engine = LayeredLayout::default();
    let new_result = tokio_test::block_on(engine.layout(new_request));
    let old_result = tokio_test::block_on(engine.layout(old_request));

    assert_eq!(coordinator.apply(new_ticket, new_result), LayoutOutcome::Applied);
    assert_eq!(coordinator.apply(old_ticket, old_result), LayoutOutcome::Stale);
    assert_eq!(coordinator.rendered().unwrap().nodes.len(), 2);
}

#[test]
fn test_layered_layout_follows_mode() {
    let state = create_nested_state();
    let graph = build_graph(state.steps());
    let request = |mode| LayoutRequest {
        nodes: graph.nodes.clone(),
        edges: graph.edges.clone(),
        mode,
    };

    let horizontal = LayeredLayout::default().arrange(request(LayoutMode::Horizontal));
    let vertical = LayeredLayout::default().arrange(request(LayoutMode::Vertical));

    let h = horizontal.node("choice-1_b0_filter-0").unwrap().position.unwrap();
    let v = vertical.node("choice-1_b0_filter-0").unwrap().position.unwrap();
    assert_eq!((h.x, h.y), (200.0, 100.0));
    assert_eq!((v.x, v.y), (100.0, 200.0));
}
