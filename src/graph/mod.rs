use crate::model::StepKind;
use serde::Serialize;

pub mod layout;
pub mod projector;

pub use layout::*;
pub use projector::build_graph;

/// Position assigned by a layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Step(StepKind),
    /// An open branch slot with no step in it yet.
    Placeholder,
}

/// Set on every node that lives inside a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    pub parent_identifier: String,
    pub branch_identifier: String,
    pub branch_index: usize,
    /// Whether this node is the entry of its branch.
    pub is_first: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub branch_info: Option<BranchInfo>,
    /// Branch nesting level; top-level steps are at 0.
    pub depth: usize,
    pub position: Option<Position>,
}

impl VisualizationNode {
    pub fn is_placeholder(&self) -> bool {
        self.kind == NodeKind::Placeholder
    }

    pub fn is_branch_entry(&self) -> bool {
        self.branch_info.as_ref().is_some_and(|info| info.is_first)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Sequential,
    BranchEntry,
    InsertAffordance,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VisualizationEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl VisualizationEdge {
    pub fn new(source: &str, target: &str, kind: EdgeKind) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VisualizationGraph {
    pub nodes: Vec<VisualizationNode>,
    pub edges: Vec<VisualizationEdge>,
}

impl VisualizationGraph {
    pub fn node(&self, id: &str) -> Option<&VisualizationNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &VisualizationEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &VisualizationNode> {
        self.nodes.iter().filter(|node| node.is_placeholder())
    }
}
