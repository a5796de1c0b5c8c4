use crate::error::EditError;
use crate::model::{BranchHop, Integration, Step, StepPath};

pub mod identity;
pub mod mutator;
pub mod nested;

pub use identity::assign_identifiers;
pub use nested::{NestedStep, NestedStepIndex, extract_nested_steps};

/// An integration together with the index derived from it.
///
/// Only ever produced by [`IntegrationState::new`] or the mutator, so branch counts
/// are validated, identifiers are always assigned and the index always matches the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntegrationState {
    integration: Integration,
    nested_steps: NestedStepIndex,
}

impl IntegrationState {
    /// Validates branch counts across the whole tree, then commits it.
    pub fn new(integration: Integration) -> Result<Self, EditError> {
        integration.steps.iter().try_for_each(Step::validate)?;
        Ok(Self::commit(integration))
    }

    /// Assigns identifiers across the whole tree and rebuilds the nested-step index.
    /// Callers must hand in a tree that already passed validation.
    pub(crate) fn commit(integration: Integration) -> Self {
        let Integration {
            dsl,
            metadata,
            steps,
            parameters,
        } = integration;
        let steps = assign_identifiers(steps);
        let nested_steps = NestedStepIndex::build(&steps);
        Self {
            integration: Integration {
                dsl,
                metadata,
                steps,
                parameters,
            },
            nested_steps,
        }
    }

    pub fn integration(&self) -> &Integration {
        &self.integration
    }

    pub fn steps(&self) -> &[Step] {
        &self.integration.steps
    }

    pub fn nested_steps(&self) -> &NestedStepIndex {
        &self.nested_steps
    }

    /// Finds where a step lives: the nested index first, then the top-level sequence.
    pub fn locate(&self, identifier: &str) -> Option<StepPath> {
        if let Some(entry) = self.nested_steps.get(identifier) {
            return Some(entry.path_to_step.clone());
        }
        self.steps()
            .iter()
            .position(|step| step.identifier == identifier)
            .map(StepPath::top_level)
    }

    pub fn find_step(&self, identifier: &str) -> Option<&Step> {
        self.locate(identifier)
            .and_then(|path| step_at(self.steps(), &path))
    }
}

/// Follows `path` down the tree.
pub fn step_at<'a>(steps: &'a [Step], path: &StepPath) -> Option<&'a Step> {
    let mut step = steps.get(path.index())?;
    for hop in path.hops() {
        step = step.branches.get(hop.branch)?.steps.get(hop.step)?;
    }
    Some(step)
}

/// Returns a new sequence where only the step at `path` is replaced.
///
/// Every ancestor along the path is rebuilt; siblings are carried over untouched.
pub(crate) fn replace_at_path(
    steps: &[Step],
    path: &StepPath,
    replacement: Step,
) -> Result<Vec<Step>, EditError> {
    let root = steps
        .get(path.index())
        .ok_or_else(|| EditError::InvalidPath(path.to_string()))?;
    let rebuilt = rebuild_along(root, path.hops(), replacement)
        .ok_or_else(|| EditError::InvalidPath(path.to_string()))?;

    let mut new_steps = steps.to_vec();
    new_steps[path.index()] = rebuilt;
    Ok(new_steps)
}

fn rebuild_along(step: &Step, hops: &[BranchHop], replacement: Step) -> Option<Step> {
    let Some((hop, rest)) = hops.split_first() else {
        return Some(replacement);
    };
    let child = step.branches.get(hop.branch)?.steps.get(hop.step)?;
    let rebuilt_child = rebuild_along(child, rest, replacement)?;

    let mut rebuilt = step.clone();
    rebuilt.branches[hop.branch].steps[hop.step] = rebuilt_child;
    Some(rebuilt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, BranchConstraints};

    fn nested_tree() -> Vec<Step> {
        let inner = Step::transform("inner")
            .with_branches(
                BranchConstraints::default(),
                vec![Branch::new(vec![Step::sink("deep")])],
            )
            .unwrap();
        let outer = Step::transform("outer")
            .with_branches(
                BranchConstraints::default(),
                vec![Branch::new(vec![Step::transform("a")]), Branch::new(vec![inner])],
            )
            .unwrap();
        vec![Step::source("start"), outer]
    }

    #[test]
    fn replace_at_path_only_touches_addressed_step() {
        let steps = nested_tree();
        let path = StepPath::top_level(1).child(1, 0).child(0, 0);

        let replaced = replace_at_path(&steps, &path, Step::sink("replacement")).unwrap();

        assert_eq!(step_at(&replaced, &path).unwrap().name(), "replacement");
        assert_eq!(replaced[0], steps[0]);
        assert_eq!(replaced[1].branches[0], steps[1].branches[0]);
        assert_eq!(step_at(&steps, &path).unwrap().name(), "deep");
    }

    #[test]
    fn replace_at_path_rejects_dangling_paths() {
        let steps = nested_tree();
        let path = StepPath::top_level(1).child(4, 0);
        assert_eq!(
            replace_at_path(&steps, &path, Step::sink("x")),
            Err(EditError::InvalidPath("steps.1.branches.4.steps.0".to_string()))
        );
    }
}
