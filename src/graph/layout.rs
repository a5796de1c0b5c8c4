use super::{Position, VisualizationEdge, VisualizationGraph, VisualizationNode};
use crate::error::LayoutError;
use log::{debug, warn};
use std::future::Future;

/// Direction the main chain flows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
}

/// Everything a layout engine needs to position one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    pub nodes: Vec<VisualizationNode>,
    pub edges: Vec<VisualizationEdge>,
    pub mode: LayoutMode,
}

/// An external, possibly slow, layout algorithm.
///
/// Implementations return the same nodes and edges with positions filled in.
pub trait LayoutEngine {
    fn layout(
        &self,
        request: LayoutRequest,
    ) -> impl Future<Output = Result<VisualizationGraph, LayoutError>>;
}

/// Handle for one submitted layout. Only the most recent ticket may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// The result was for the latest graph and is now rendered.
    Applied,
    /// A newer graph was submitted meanwhile; the result was dropped.
    Stale,
    /// The engine failed; the previously rendered graph is kept.
    Failed,
}

/// Tracks submitted layouts and decides which results reach the rendered graph.
#[derive(Debug, Default)]
pub struct LayoutCoordinator {
    mode: LayoutMode,
    latest: u64,
    rendered: Option<VisualizationGraph>,
}

impl LayoutCoordinator {
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
    }

    /// Registers `graph` as the newest one to lay out. Any ticket handed out before is now stale.
    pub fn submit(&mut self, graph: VisualizationGraph) -> (LayoutTicket, LayoutRequest) {
        self.latest += 1;
        let ticket = LayoutTicket {
            generation: self.latest,
        };
        let request = LayoutRequest {
            nodes: graph.nodes,
            edges: graph.edges,
            mode: self.mode,
        };
        (ticket, request)
    }

    /// Marks every outstanding ticket as stale, e.g. because the tree was edited.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    /// Applies a finished layout if it belongs to the latest submission.
    pub fn apply(
        &mut self,
        ticket: LayoutTicket,
        result: Result<VisualizationGraph, LayoutError>,
    ) -> LayoutOutcome {
        if ticket.generation != self.latest {
            debug!(
                "Discarding layout for generation {} (latest is {})",
                ticket.generation, self.latest
            );
            return LayoutOutcome::Stale;
        }
        match result {
            Ok(graph) => {
                self.rendered = Some(graph);
                LayoutOutcome::Applied
            }
            Err(e) => {
                warn!("{}; keeping the previously rendered graph", e);
                LayoutOutcome::Failed
            }
        }
    }

    /// Submits `graph`, waits for `engine`, and applies the result.
    pub async fn run<E: LayoutEngine>(
        &mut self,
        engine: &E,
        graph: VisualizationGraph,
    ) -> LayoutOutcome {
        let (ticket, request) = self.submit(graph);
        let result = engine.layout(request).await;
        self.apply(ticket, result)
    }

    /// The last successfully applied layout, if any.
    pub fn rendered(&self) -> Option<&VisualizationGraph> {
        self.rendered.as_ref()
    }
}

/// A simple reference engine: one column per node in depth-first order, one row per
/// nesting level. Good enough for previews and tests; real canvases plug in their own.
#[derive(Debug, Clone, Copy)]
pub struct LayeredLayout {
    pub spacing: f64,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self { spacing: 100.0 }
    }
}

impl LayeredLayout {
    pub fn arrange(&self, request: LayoutRequest) -> VisualizationGraph {
        let nodes = request
            .nodes
            .into_iter()
            .enumerate()
            .map(|(order, mut node)| {
                let along = order as f64 * self.spacing;
                let across = node.depth as f64 * self.spacing;
                node.position = Some(match request.mode {
                    LayoutMode::Horizontal => Position {
                        x: along,
                        y: across,
                    },
                    LayoutMode::Vertical => Position {
                        x: across,
                        y: along,
                    },
                });
                node
            })
            .collect();
        VisualizationGraph {
            nodes,
            edges: request.edges,
        }
    }
}

impl LayoutEngine for LayeredLayout {
    async fn layout(&self, request: LayoutRequest) -> Result<VisualizationGraph, LayoutError> {
        Ok(self.arrange(request))
    }
}
