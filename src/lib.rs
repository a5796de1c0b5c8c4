//! # Kumitate - Branch-Aware Integration Editing Engine
//!
//! **Kumitate** is the editing core behind visual integration designers. An integration
//! is an ordered sequence of processing steps, and any step may own branches: nested
//! sequences of steps, to arbitrary depth. Kumitate keeps three things consistent after
//! every edit:
//!
//! 1.  **The step tree**: the canonical [`model::Integration`].
//! 2.  **The nested-step index**: a flat map from every step inside a branch to the step
//!     owning that branch and the path leading to it ([`tree::NestedStepIndex`]).
//! 3.  **The graph projection**: nodes and edges ready for a layout engine and a canvas
//!     ([`graph::build_graph`]).
//!
//! ## Core Workflow
//!
//! Edits are pure functions in [`tree::mutator`] taking the current
//! [`tree::IntegrationState`] and returning a new one. Identifiers are recomputed from
//! names and positions on every edit, and the index is rebuilt from scratch. The
//! [`editor::Editor`] wraps those functions with a subscribable store, undo/redo,
//! selection, view metadata and layout scheduling.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumitate::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let mut editor = Editor::builder().build()?;
//!
//!     editor.append(Step::source("timer"))?;
//!     editor.append(Step::sink("log"))?;
//!
//!     let choice = Step::transform("choice").with_branches(
//!         BranchConstraints::new(1, None),
//!         vec![Branch::new(vec![Step::transform("filter")]), Branch::empty()],
//!     )?;
//!     editor.insert_at(choice, 1)?;
//!
//!     // The nested "filter" step is addressable through the index.
//!     let state = editor.state();
//!     let entry = state.nested_steps().get("choice-1_b0_filter-0").unwrap();
//!     println!("{} lives at {}", entry.step_identifier, entry.path_to_step);
//!
//!     let graph = editor.graph();
//!     println!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len());
//!
//!     editor.undo();
//!     assert_eq!(editor.steps().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod editor;
pub mod error;
pub mod graph;
pub mod history;
pub mod model;
pub mod prelude;
pub mod selection;
pub mod store;
pub mod tree;
pub mod views;
