use crate::model::{Step, StepPath};
use ahash::AHashMap;
use serde::Serialize;

/// Where a nested step lives: the step owning its branch, and its full path from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedStep {
    pub step_identifier: String,
    /// The nearest ancestor step that owns the branch containing this step.
    pub origin_step_identifier: String,
    pub branch_identifier: String,
    pub path_to_step: StepPath,
}

/// Walks the tree depth-first and records every step found strictly inside a branch.
///
/// Top-level steps are never listed; their position is their identity.
pub fn extract_nested_steps(steps: &[Step]) -> Vec<NestedStep> {
    let mut entries = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        collect_branch_steps(step, &StepPath::top_level(index), &mut entries);
    }
    entries
}

fn collect_branch_steps(parent: &Step, parent_path: &StepPath, entries: &mut Vec<NestedStep>) {
    for (branch_index, branch) in parent.branches.iter().enumerate() {
        for (step_index, step) in branch.steps.iter().enumerate() {
            let path = parent_path.child(branch_index, step_index);
            entries.push(NestedStep {
                step_identifier: step.identifier.clone(),
                origin_step_identifier: parent.identifier.clone(),
                branch_identifier: branch.identifier.clone(),
                path_to_step: path.clone(),
            });
            collect_branch_steps(step, &path, entries);
        }
    }
}

/// The nested-step entries plus an identifier lookup. Rebuilt wholesale after every edit.
#[derive(Debug, Clone, Default)]
pub struct NestedStepIndex {
    entries: Vec<NestedStep>,
    positions: AHashMap<String, usize>,
}

impl NestedStepIndex {
    pub fn build(steps: &[Step]) -> Self {
        let entries = extract_nested_steps(steps);
        let positions = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.step_identifier.clone(), position))
            .collect();
        Self { entries, positions }
    }

    pub fn get(&self, step_identifier: &str) -> Option<&NestedStep> {
        self.positions
            .get(step_identifier)
            .map(|&position| &self.entries[position])
    }

    pub fn contains(&self, step_identifier: &str) -> bool {
        self.positions.contains_key(step_identifier)
    }

    pub fn entries(&self) -> &[NestedStep] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &NestedStep> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for NestedStepIndex {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
