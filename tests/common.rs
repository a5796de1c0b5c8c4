//! Common test utilities for building step trees.
use kumitate::prelude::*;

/// A branching step that accepts any number of branches and wants at least one.
#[allow(dead_code)]
pub fn choice(name: &str, branches: Vec<Vec<Step>>) -> Step {
    Step::transform(name)
        .with_branches(
            BranchConstraints::new(1, None),
            branches.into_iter().map(Branch::new).collect(),
        )
        .expect("choice fixture should satisfy its own constraints")
}

/// Committed state holding `steps`.
#[allow(dead_code)]
pub fn state_with(steps: Vec<Step>) -> IntegrationState {
    mutator::bulk_replace(&IntegrationState::default(), IntegrationPatch::with_steps(steps))
        .expect("fixture steps should be valid")
}

/// `timer -> choice(when: [filter, log], otherwise: [choice(deep: [marshal])]) -> sink`
///
/// Identifiers after commit:
/// - `timer-0`, `choice-1`, `sink-2`
/// - `choice-1_b0_filter-0`, `choice-1_b0_log-1`
/// - `choice-1_b1_inner-0`, `choice-1_b1_inner-0_b0_marshal-0`
#[allow(dead_code)]
pub fn create_nested_steps() -> Vec<Step> {
    vec![
        Step::source("timer").with_parameter("period", 1000),
        choice(
            "choice",
            vec![
                vec![Step::transform("filter"), Step::transform("log")],
                vec![choice("inner", vec![vec![Step::transform("marshal")]])],
            ],
        ),
        Step::sink("sink"),
    ]
}

#[allow(dead_code)]
pub fn create_nested_state() -> IntegrationState {
    state_with(create_nested_steps())
}

#[allow(dead_code)]
pub fn names(steps: &[Step]) -> Vec<&str> {
    steps.iter().map(Step::name).collect()
}

/// Every identifier in the tree, depth-first.
#[allow(dead_code)]
pub fn all_identifiers(steps: &[Step]) -> Vec<String> {
    let mut ids = Vec::new();
    for step in steps {
        ids.push(step.identifier().to_string());
        for branch in step.branches() {
            ids.extend(all_identifiers(branch.steps()));
        }
    }
    ids
}

/// Tree with all identifiers cleared, for comparisons that ignore addressing.
#[allow(dead_code)]
pub fn shape(steps: &[Step]) -> Vec<Step> {
    steps.iter().map(Step::without_identifiers).collect()
}
