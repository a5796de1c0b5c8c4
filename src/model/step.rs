use crate::error::EditError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The role a step plays in an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    #[serde(alias = "START")]
    Source,
    #[serde(alias = "MIDDLE")]
    Transform,
    #[serde(alias = "END")]
    Sink,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Source => write!(f, "source"),
            StepKind::Transform => write!(f, "transform"),
            StepKind::Sink => write!(f, "sink"),
        }
    }
}

/// A single configured value on a step or on the integration itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Parameter {
    pub fn new(id: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// How many branches a step may own. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchConstraints {
    #[serde(default)]
    pub min_branches: usize,
    #[serde(
        default,
        serialize_with = "serialize_max_branches",
        deserialize_with = "deserialize_max_branches"
    )]
    pub max_branches: Option<usize>,
}

impl BranchConstraints {
    /// A step that can never own branches.
    pub const NONE: BranchConstraints = BranchConstraints {
        min_branches: 0,
        max_branches: Some(0),
    };

    pub fn new(min_branches: usize, max_branches: Option<usize>) -> Self {
        Self {
            min_branches,
            max_branches,
        }
    }

    pub fn allows(&self, count: usize) -> bool {
        self.max_branches.is_none_or(|max| count <= max)
    }

    pub fn is_at_max(&self, count: usize) -> bool {
        self.max_branches.is_some_and(|max| count >= max)
    }

    pub(crate) fn violation(&self, step: &str, found: usize) -> EditError {
        EditError::BranchConstraintViolation {
            step: step.to_string(),
            min: self.min_branches,
            max: self
                .max_branches
                .map(|max| max.to_string())
                .unwrap_or_else(|| "unbounded".to_string()),
            found,
        }
    }
}

impl Default for BranchConstraints {
    fn default() -> Self {
        Self {
            min_branches: 0,
            max_branches: None,
        }
    }
}

// External payloads encode "unbounded" as -1.
fn serialize_max_branches<S: Serializer>(max: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
    match max {
        Some(max) => s.serialize_i64(*max as i64),
        None => s.serialize_i64(-1),
    }
}

fn deserialize_max_branches<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    match Option::<i64>::deserialize(d)? {
        None | Some(-1) => Ok(None),
        Some(max) => usize::try_from(max).map(Some).map_err(|_| {
            D::Error::custom(format!(
                "maxBranches must be -1 (unbounded) or non-negative, got {}",
                max
            ))
        }),
    }
}

/// An ordered sub-sequence of steps owned by exactly one parent step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default, skip_deserializing)]
    pub(crate) identifier: String,
    #[serde(default)]
    pub(crate) steps: Vec<Step>,
}

impl Branch {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            identifier: String::new(),
            steps,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// One unit of processing in an integration.
///
/// The `identifier` is an address within the current tree, recomputed after every
/// structural edit. Use it to talk about a step *now*, never to track it across edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(rename = "UUID", default, skip_deserializing)]
    pub(crate) identifier: String,
    #[serde(rename = "type", alias = "kind")]
    pub(crate) kind: StepKind,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) parameters: Vec<Parameter>,
    #[serde(default)]
    pub(crate) branches: Vec<Branch>,
    #[serde(flatten)]
    pub(crate) branch_constraints: BranchConstraints,
}

impl Step {
    /// Creates a step that owns no branches and may never own any.
    pub fn new(kind: StepKind, name: impl Into<String>) -> Self {
        Self {
            identifier: String::new(),
            kind,
            name: name.into(),
            parameters: Vec::new(),
            branches: Vec::new(),
            branch_constraints: BranchConstraints::NONE,
        }
    }

    pub fn source(name: impl Into<String>) -> Self {
        Self::new(StepKind::Source, name)
    }

    pub fn transform(name: impl Into<String>) -> Self {
        Self::new(StepKind::Transform, name)
    }

    pub fn sink(name: impl Into<String>) -> Self {
        Self::new(StepKind::Sink, name)
    }

    pub fn with_parameter(mut self, id: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.push(Parameter::new(id, value));
        self
    }

    /// Turns this step into a branching step. Fails if `branches` does not fit `constraints`.
    pub fn with_branches(
        mut self,
        constraints: BranchConstraints,
        branches: Vec<Branch>,
    ) -> Result<Self, EditError> {
        self.branch_constraints = constraints;
        self.branches = branches;
        self.validate()?;
        Ok(self)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch_constraints(&self) -> BranchConstraints {
        self.branch_constraints
    }

    pub fn has_branches(&self) -> bool {
        !self.branches.is_empty()
    }

    /// Number of steps in this subtree, this step included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .branches
            .iter()
            .flat_map(|b| b.steps.iter())
            .map(Step::subtree_len)
            .sum::<usize>()
    }

    /// Checks the branch count against the declared maximum, recursively.
    ///
    /// Fewer branches than `min_branches` is not an error; the graph shows the
    /// missing ones as open slots.
    pub fn validate(&self) -> Result<(), EditError> {
        if !self.branch_constraints.allows(self.branches.len()) {
            return Err(self
                .branch_constraints
                .violation(self.label(), self.branches.len()));
        }
        self.branches
            .iter()
            .flat_map(|b| b.steps.iter())
            .try_for_each(Step::validate)
    }

    /// Identifier when one was assigned, otherwise the name.
    pub(crate) fn label(&self) -> &str {
        if self.identifier.is_empty() {
            &self.name
        } else {
            &self.identifier
        }
    }

    /// Same step without identifiers anywhere in its subtree.
    pub fn without_identifiers(&self) -> Step {
        Step {
            identifier: String::new(),
            branches: self
                .branches
                .iter()
                .map(|b| Branch::new(b.steps.iter().map(Step::without_identifiers).collect()))
                .collect(),
            ..self.clone()
        }
    }
}
