//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the kumitate
//! crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumitate::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let payload = std::fs::read_to_string("path/to/integration.json")?;
//!
//! let mut editor = Editor::default();
//! editor.import(payload.as_str())?;
//!
//! for entry in editor.nested_steps().iter() {
//!     println!("{} -> {}", entry.step_identifier, entry.path_to_step);
//! }
//! # Ok(())
//! # }
//! ```

// Editing session
pub use crate::editor::{Editor, EditorBuilder};
pub use crate::history::EditHistory;
pub use crate::selection::{SelectedStep, resolve_selection};
pub use crate::store::Store;
pub use crate::views::{ViewDefinition, ViewProvider};

// Step tree
pub use crate::model::{
    Branch, BranchConstraints, Integration, IntegrationPatch, IntoIntegration, Metadata,
    Parameter, Step, StepKind, StepPath,
};
pub use crate::tree::{
    IntegrationState, NestedStep, NestedStepIndex, assign_identifiers, extract_nested_steps,
    mutator,
};

// Graph projection and layout
pub use crate::graph::{
    EdgeKind, LayeredLayout, LayoutCoordinator, LayoutEngine, LayoutMode, LayoutOutcome,
    NodeKind, VisualizationEdge, VisualizationGraph, VisualizationNode, build_graph,
};

// Error types
pub use crate::error::{EditError, ImportError, LayoutError, ViewError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
