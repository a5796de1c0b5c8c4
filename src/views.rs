use crate::error::ViewError;
use crate::model::Step;
use serde::{Deserialize, Serialize};

/// Metadata describing an extra panel that can be shown for some steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub step_identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// External source of view metadata, asked again whenever the step tree changes.
pub trait ViewProvider {
    fn fetch_views(&self, steps: &[Step]) -> Result<Vec<ViewDefinition>, ViewError>;
}

impl<F> ViewProvider for F
where
    F: Fn(&[Step]) -> Result<Vec<ViewDefinition>, ViewError>,
{
    fn fetch_views(&self, steps: &[Step]) -> Result<Vec<ViewDefinition>, ViewError> {
        self(steps)
    }
}
