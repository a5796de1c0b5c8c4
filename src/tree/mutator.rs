//! Whole-tree edit operations.
//!
//! Every operation takes the current [`IntegrationState`] by reference and returns a
//! brand new one. The previous state is never touched, so anyone still holding it
//! keeps a consistent view. Each result is committed wholesale,
//! which reassigns identifiers and rebuilds the nested-step index.

use super::{IntegrationState, replace_at_path, step_at};
use crate::error::EditError;
use crate::model::{Branch, Integration, IntegrationPatch, Step, StepPath};

/// Adds `step` after the last top-level step.
pub fn append(state: &IntegrationState, step: Step) -> Result<IntegrationState, EditError> {
    step.validate()?;
    let mut steps = state.steps().to_vec();
    steps.push(step);
    Ok(commit_steps(state, steps))
}

/// Inserts `step` at top-level position `index`, shifting later steps right.
///
/// An index past the end appends.
pub fn insert_at(
    state: &IntegrationState,
    step: Step,
    index: usize,
) -> Result<IntegrationState, EditError> {
    step.validate()?;
    let mut steps = state.steps().to_vec();
    let index = index.min(steps.len());
    steps.insert(index, step);
    Ok(commit_steps(state, steps))
}

/// Removes the top-level step at `index`.
pub fn delete_at(state: &IntegrationState, index: usize) -> Result<IntegrationState, EditError> {
    let mut steps = state.steps().to_vec();
    check_index(index, steps.len())?;
    steps.remove(index);
    Ok(commit_steps(state, steps))
}

/// Resets to the empty integration.
pub fn delete_all(_state: &IntegrationState) -> IntegrationState {
    IntegrationState::commit(Integration::default())
}

/// Overwrites the top-level step at `index`, or puts `step` in front when no index is given.
pub fn replace_at(
    state: &IntegrationState,
    step: Step,
    index: Option<usize>,
) -> Result<IntegrationState, EditError> {
    step.validate()?;
    let mut steps = state.steps().to_vec();
    match index {
        Some(index) => {
            check_index(index, steps.len())?;
            steps[index] = step;
        }
        None => steps.insert(0, step),
    }
    Ok(commit_steps(state, steps))
}

/// Overwrites the step at `path`, however deep. Ancestors along the path are rebuilt.
pub fn replace_in_branch(
    state: &IntegrationState,
    step: Step,
    path: &StepPath,
) -> Result<IntegrationState, EditError> {
    step.validate()?;
    let steps = replace_at_path(state.steps(), path, step)?;
    Ok(commit_steps(state, steps))
}

/// Overwrites the top-level parent at `parent_index` with a copy that no longer holds
/// the removed child.
///
/// The replacement may not drop whole branches below the parent's minimum.
pub fn delete_in_branch(
    state: &IntegrationState,
    replacement_parent: Step,
    parent_index: usize,
) -> Result<IntegrationState, EditError> {
    let current = state
        .steps()
        .get(parent_index)
        .ok_or(EditError::InvalidIndex {
            index: parent_index,
            len: state.steps().len(),
        })?;
    check_branch_removal(current, &replacement_parent)?;
    replacement_parent.validate()?;

    let mut steps = state.steps().to_vec();
    steps[parent_index] = replacement_parent;
    Ok(commit_steps(state, steps))
}

/// Merges imported fields into the integration. Foreign identifiers are discarded.
pub fn bulk_replace(
    state: &IntegrationState,
    patch: IntegrationPatch,
) -> Result<IntegrationState, EditError> {
    if let Some(steps) = &patch.steps {
        steps.iter().try_for_each(Step::validate)?;
    }
    Ok(IntegrationState::commit(patch.merge_into(state.integration())))
}

/// Appends an empty branch to the step identified by `identifier`.
pub fn add_branch(
    state: &IntegrationState,
    identifier: &str,
) -> Result<IntegrationState, EditError> {
    let (path, step) = resolve(state, identifier)?;
    let count = step.branches.len();
    if step.branch_constraints.is_at_max(count) {
        return Err(step.branch_constraints.violation(identifier, count + 1));
    }

    let mut updated = step.clone();
    updated.branches.push(Branch::empty());
    let steps = replace_at_path(state.steps(), &path, updated)?;
    Ok(commit_steps(state, steps))
}

/// Removes a step that lives inside a branch, at any depth.
///
/// Looks the step up in the nested-step index, rebuilds its parent without it and
/// writes the parent back: through [`delete_in_branch`] for a top-level parent, or
/// through a path replacement for a deeper one.
pub fn remove_nested_step(
    state: &IntegrationState,
    identifier: &str,
) -> Result<IntegrationState, EditError> {
    let entry = state
        .nested_steps()
        .get(identifier)
        .ok_or_else(|| EditError::UnresolvableIdentifier(identifier.to_string()))?;
    let path = &entry.path_to_step;
    let (Some(parent_path), Some(hop)) = (path.parent(), path.last_hop()) else {
        return Err(EditError::InvalidPath(path.to_string()));
    };
    let parent = step_at(state.steps(), &parent_path)
        .ok_or_else(|| EditError::InvalidPath(parent_path.to_string()))?;

    let mut filtered = parent.clone();
    filtered.branches[hop.branch].steps.remove(hop.step);

    if parent_path.is_nested() {
        replace_in_branch(state, filtered, &parent_path)
    } else {
        delete_in_branch(state, filtered, parent_path.index())
    }
}

fn resolve<'a>(
    state: &'a IntegrationState,
    identifier: &str,
) -> Result<(StepPath, &'a Step), EditError> {
    let path = state
        .locate(identifier)
        .ok_or_else(|| EditError::UnresolvableIdentifier(identifier.to_string()))?;
    let step = step_at(state.steps(), &path)
        .ok_or_else(|| EditError::InvalidPath(path.to_string()))?;
    Ok((path, step))
}

fn check_index(index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::InvalidIndex { index, len })
    }
}

fn check_branch_removal(current: &Step, replacement: &Step) -> Result<(), EditError> {
    let before = current.branches.len();
    let after = replacement.branches.len();
    let min = replacement.branch_constraints.min_branches;
    if after < before && after < min {
        return Err(replacement
            .branch_constraints
            .violation(current.identifier(), after));
    }
    Ok(())
}

fn commit_steps(state: &IntegrationState, steps: Vec<Step>) -> IntegrationState {
    IntegrationState::commit(state.integration().with_steps(steps))
}
