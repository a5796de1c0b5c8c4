use super::step::{Parameter, Step};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DSL: &str = "Integration";
pub const DEFAULT_NAME: &str = "integration";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            namespace: None,
        }
    }
}

/// The root document: a dialect tag, metadata, the step tree and integration-level parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub dsl: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
    #[serde(default, rename = "params", alias = "parameters")]
    pub parameters: Vec<Parameter>,
}

impl Default for Integration {
    fn default() -> Self {
        Self {
            dsl: DEFAULT_DSL.to_string(),
            metadata: Metadata::default(),
            steps: Vec::new(),
            parameters: Vec::new(),
        }
    }
}

impl Integration {
    pub fn new(dsl: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            dsl: dsl.into(),
            metadata,
            ..Self::default()
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Total number of steps, nested ones included.
    pub fn step_count(&self) -> usize {
        self.steps.iter().map(Step::subtree_len).sum()
    }

    pub(crate) fn with_steps(&self, steps: Vec<Step>) -> Self {
        Self {
            dsl: self.dsl.clone(),
            metadata: self.metadata.clone(),
            steps,
            parameters: self.parameters.clone(),
        }
    }

    /// Serializes the integration for the export boundary.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Fields to merge into an [`Integration`] on import or load. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntegrationPatch {
    #[serde(default)]
    pub dsl: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub steps: Option<Vec<Step>>,
    #[serde(default, rename = "params", alias = "parameters")]
    pub parameters: Option<Vec<Parameter>>,
}

impl IntegrationPatch {
    pub fn with_steps(steps: Vec<Step>) -> Self {
        Self {
            steps: Some(steps),
            ..Self::default()
        }
    }

    pub(crate) fn merge_into(self, base: &Integration) -> Integration {
        Integration {
            dsl: self.dsl.unwrap_or_else(|| base.dsl.clone()),
            metadata: self.metadata.unwrap_or_else(|| base.metadata.clone()),
            steps: self.steps.unwrap_or_else(|| base.steps.clone()),
            parameters: self.parameters.unwrap_or_else(|| base.parameters.clone()),
        }
    }
}
