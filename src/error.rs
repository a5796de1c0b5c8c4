use thiserror::Error;

/// Errors raised synchronously by step tree edits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Index {index} is out of range for a sequence of {len} steps")]
    InvalidIndex { index: usize, len: usize },

    #[error("Path '{0}' does not address a step in the current tree")]
    InvalidPath(String),

    #[error("No step with identifier '{0}' exists in the current tree")]
    UnresolvableIdentifier(String),

    #[error(
        "Step '{step}' allows between {min} and {max} branches, but the edit would leave {found}"
    )]
    BranchConstraintViolation {
        step: String,
        min: usize,
        max: String,
        found: usize,
    },
}

/// Errors reported by an external layout engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Layout failed: {0}")]
    LayoutFailure(String),
}

/// Errors that can occur when bringing an externally sourced integration into the editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Failed to parse integration JSON: {0}")]
    JsonParseError(String),

    #[error("Imported integration is invalid: {0}")]
    Edit(#[from] EditError),
}

/// Errors reported by a view metadata provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Could not fetch views: {0}")]
    FetchFailed(String),
}
