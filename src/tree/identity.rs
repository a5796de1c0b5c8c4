//! Positional identifier assignment.
//!
//! A step's identifier is `<name>-<index>` prefixed by the identifier of the branch it
//! lives in, and a branch's identifier is `<owner>_b<branch index>`:
//!
//! ```text
//! choice-1                      top-level step 1
//! choice-1_b0                   its first branch
//! choice-1_b0_log-0             first step of that branch
//! ```
//!
//! Names are reduced to their alphanumeric characters, so `-` and `_` only ever appear
//! as separators and two different positions can never render to the same string.

use crate::model::{Branch, Step};

const FALLBACK_NAME: &str = "step";

/// Recomputes every identifier in the tree from names and positions.
///
/// Deterministic: structurally equal input always yields byte-identical identifiers.
pub fn assign_identifiers(steps: Vec<Step>) -> Vec<Step> {
    assign_in_sequence(steps, "")
}

fn assign_in_sequence(steps: Vec<Step>, prefix: &str) -> Vec<Step> {
    steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let identifier = format!("{}{}-{}", prefix, sanitize_name(&step.name), index);
            let branches = step
                .branches
                .into_iter()
                .enumerate()
                .map(|(branch_index, branch)| {
                    let branch_id = branch_identifier(&identifier, branch_index);
                    let steps = assign_in_sequence(branch.steps, &format!("{}_", branch_id));
                    Branch {
                        identifier: branch_id,
                        steps,
                    }
                })
                .collect();
            Step {
                identifier,
                branches,
                ..step
            }
        })
        .collect()
}

/// Identifier of the `branch_index`-th branch of the step identified by `owner`.
///
/// Also used for branch slots that do not exist yet, so placeholders get stable ids.
pub(crate) fn branch_identifier(owner: &str, branch_index: usize) -> String {
    format!("{}_b{}", owner, branch_index)
}

fn sanitize_name(name: &str) -> String {
    let sanitized: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
    if sanitized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_name("log-0_b1"), "log0b1");
        assert_eq!(sanitize_name("---"), "step");
        assert_eq!(sanitize_name("kafka source"), "kafkasource");
    }

    #[test]
    fn separator_names_cannot_collide_with_nested_addresses() {
        let nested = Step::transform("x");
        let choice = Step::transform("a")
            .with_branches(
                crate::model::BranchConstraints::default(),
                vec![Branch::new(vec![nested])],
            )
            .unwrap();
        // Without sanitizing, this name would render as "a-0_b0_x-0" at index 0.
        let impostor = Step::transform("a-0_b0_x");

        let steps = assign_identifiers(vec![impostor, choice]);
        assert_eq!(steps[0].identifier(), "a0b0x-0");
        assert_eq!(steps[1].branches()[0].steps()[0].identifier(), "a-1_b0_x-0");
    }
}
