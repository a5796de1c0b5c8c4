use crate::error::EditError;
use crate::model::{Step, StepPath};
use crate::tree::{IntegrationState, step_at};

/// A step the user picked on the canvas, resolved against a specific tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedStep {
    pub identifier: String,
    pub path: StepPath,
    /// The step owning the branch this step lives in, if it is nested.
    pub origin_step_identifier: Option<String>,
    pub step: Step,
}

impl SelectedStep {
    pub fn is_nested(&self) -> bool {
        self.path.is_nested()
    }
}

/// Resolves a node identifier back to its step: the nested-step index is checked first,
/// then the top-level sequence.
pub fn resolve_selection(
    state: &IntegrationState,
    identifier: &str,
) -> Result<SelectedStep, EditError> {
    let (path, origin) = match state.nested_steps().get(identifier) {
        Some(entry) => (
            entry.path_to_step.clone(),
            Some(entry.origin_step_identifier.clone()),
        ),
        None => {
            let index = state
                .steps()
                .iter()
                .position(|step| step.identifier() == identifier)
                .ok_or_else(|| EditError::UnresolvableIdentifier(identifier.to_string()))?;
            (StepPath::top_level(index), None)
        }
    };

    let step = step_at(state.steps(), &path)
        .ok_or_else(|| EditError::UnresolvableIdentifier(identifier.to_string()))?;

    Ok(SelectedStep {
        identifier: identifier.to_string(),
        path,
        origin_step_identifier: origin,
        step: step.clone(),
    })
}
