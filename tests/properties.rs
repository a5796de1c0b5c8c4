//! Property-based tests for identifier assignment, the nested index and the mutator.
mod common;
use common::*;
use kumitate::prelude::*;
use kumitate::tree::step_at;
use proptest::prelude::*;
use std::collections::HashSet;

fn kind_strategy() -> impl Strategy<Value = StepKind> {
    prop_oneof![
        Just(StepKind::Source),
        Just(StepKind::Transform),
        Just(StepKind::Sink),
    ]
}

/// Names are deliberately drawn from a tiny alphabet, including separator characters,
/// so collisions between siblings and look-alike identifiers are common.
fn name_strategy() -> impl Strategy<Value = String> {
    "[ab_-]{0,3}"
}

/// Arbitrary step trees up to four levels deep.
fn step_strategy() -> impl Strategy<Value = Step> {
    let leaf = (kind_strategy(), name_strategy()).prop_map(|(kind, name)| Step::new(kind, name));
    leaf.prop_recursive(4, 32, 3, |inner| {
        (
            name_strategy(),
            prop::collection::vec(prop::collection::vec(inner, 0..3), 0..3),
        )
            .prop_map(|(name, branches)| {
                Step::transform(name)
                    .with_branches(
                        BranchConstraints::new(0, None),
                        branches.into_iter().map(Branch::new).collect(),
                    )
                    .expect("unbounded constraints accept any branch count")
            })
    })
}

fn tree_strategy() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(), 0..6)
}

fn count_steps(steps: &[Step]) -> usize {
    steps.iter().map(Step::subtree_len).sum()
}

proptest! {
    #[test]
    fn identifiers_are_unique(steps in tree_strategy()) {
        let state = state_with(steps);
        let ids = all_identifiers(state.steps());
        let unique: HashSet<_> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn identifiers_are_deterministic(steps in tree_strategy()) {
        let first = assign_identifiers(steps.clone());
        let second = assign_identifiers(steps);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(assign_identifiers(first.clone()), first);
    }

    #[test]
    fn nested_index_covers_exactly_the_nested_steps(steps in tree_strategy()) {
        let state = state_with(steps);
        let index = state.nested_steps();
        prop_assert_eq!(index.len() + state.steps().len(), count_steps(state.steps()));

        for entry in index.iter() {
            let step = step_at(state.steps(), &entry.path_to_step);
            prop_assert_eq!(step.map(Step::identifier), Some(entry.step_identifier.as_str()));
            prop_assert!(entry.path_to_step.is_nested());
        }
        for step in state.steps() {
            prop_assert!(!index.contains(step.identifier()));
        }
    }

    #[test]
    fn insert_then_delete_restores_shape(
        steps in tree_strategy(),
        extra in step_strategy(),
        at in 0usize..8,
    ) {
        let state = state_with(steps);
        let at = at.min(state.steps().len());
        let inserted = mutator::insert_at(&state, extra, at).unwrap();
        prop_assert_eq!(inserted.steps().len(), state.steps().len() + 1);

        let restored = mutator::delete_at(&inserted, at).unwrap();
        prop_assert_eq!(shape(restored.steps()), shape(state.steps()));
        prop_assert_eq!(restored.steps(), state.steps());
    }

    #[test]
    fn graph_has_a_node_per_step(steps in tree_strategy()) {
        let state = state_with(steps);
        let graph = build_graph(state.steps());
        let real = graph.nodes.iter().filter(|n| !n.is_placeholder()).count();
        prop_assert_eq!(real, count_steps(state.steps()));
        prop_assert_eq!(&build_graph(state.steps()), &graph);

        let ids: HashSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(ids.len(), graph.nodes.len());
        for edge in &graph.edges {
            prop_assert!(ids.contains(edge.source.as_str()));
            prop_assert!(ids.contains(edge.target.as_str()));
        }
    }
}
