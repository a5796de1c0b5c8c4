use super::{BranchInfo, EdgeKind, NodeKind, VisualizationEdge, VisualizationGraph, VisualizationNode};
use crate::model::Step;
use crate::tree::identity::branch_identifier;
use itertools::Itertools;

const PLACEHOLDER_SUFFIX: &str = "-placeholder";

/// Projects a step tree onto a node/edge graph.
///
/// Pure: the same tree always yields the same nodes and edges, in the same order.
pub fn build_graph(steps: &[Step]) -> VisualizationGraph {
    let mut nodes = Vec::new();
    build_nodes(steps, None, 0, &mut nodes);

    let mut edges = build_sequential_edges(&nodes);
    build_branch_edges(steps, &mut edges);

    VisualizationGraph { nodes, edges }
}

/// One node per step in depth-first order, plus one placeholder per open branch slot.
fn build_nodes(
    steps: &[Step],
    branch: Option<(&Step, usize, &str)>,
    depth: usize,
    nodes: &mut Vec<VisualizationNode>,
) {
    for (index, step) in steps.iter().enumerate() {
        nodes.push(VisualizationNode {
            id: step.identifier.clone(),
            label: step.name.clone(),
            kind: NodeKind::Step(step.kind),
            branch_info: branch.map(|(parent, branch_index, branch_id)| BranchInfo {
                parent_identifier: parent.identifier.clone(),
                branch_identifier: branch_id.to_string(),
                branch_index,
                is_first: index == 0,
            }),
            depth,
            position: None,
        });

        for slot in 0..branch_slot_count(step) {
            match step.branches.get(slot) {
                Some(branch) if !branch.steps.is_empty() => build_nodes(
                    &branch.steps,
                    Some((step, slot, &branch.identifier)),
                    depth + 1,
                    nodes,
                ),
                _ => nodes.push(placeholder_node(step, slot, depth + 1)),
            }
        }
    }
}

/// Existing branches, or the declared minimum when fewer exist.
fn branch_slot_count(step: &Step) -> usize {
    step.branches
        .len()
        .max(step.branch_constraints.min_branches)
}

fn slot_identifier(step: &Step, slot: usize) -> String {
    match step.branches.get(slot) {
        Some(branch) => branch.identifier.clone(),
        None => branch_identifier(&step.identifier, slot),
    }
}

fn placeholder_node(parent: &Step, slot: usize, depth: usize) -> VisualizationNode {
    let branch_id = slot_identifier(parent, slot);
    VisualizationNode {
        id: format!("{}{}", branch_id, PLACEHOLDER_SUFFIX),
        label: String::new(),
        kind: NodeKind::Placeholder,
        branch_info: Some(BranchInfo {
            parent_identifier: parent.identifier.clone(),
            branch_identifier: branch_id,
            branch_index: slot,
            is_first: true,
        }),
        depth,
        position: None,
    }
}

/// The top-level chain: consecutive nodes that do not live inside a branch.
fn build_sequential_edges(nodes: &[VisualizationNode]) -> Vec<VisualizationEdge> {
    nodes
        .iter()
        .filter(|node| node.branch_info.is_none())
        .tuple_windows()
        .map(|(a, b)| VisualizationEdge::new(&a.id, &b.id, EdgeKind::Sequential))
        .collect()
}

/// Edges contributed by branches, walked recursively:
/// - branch-entry from the owning step to the first node of each branch slot
/// - sequential between consecutive steps inside a branch
/// - insert-affordance from the last node of a branch to the step after the owner
fn build_branch_edges(steps: &[Step], edges: &mut Vec<VisualizationEdge>) {
    for (index, step) in steps.iter().enumerate() {
        let merge_target = steps.get(index + 1).map(|next| next.identifier.as_str());

        for slot in 0..branch_slot_count(step) {
            let (first, last) = match step.branches.get(slot) {
                Some(branch) if !branch.steps.is_empty() => {
                    for (a, b) in branch.steps.iter().tuple_windows() {
                        edges.push(VisualizationEdge::new(
                            &a.identifier,
                            &b.identifier,
                            EdgeKind::Sequential,
                        ));
                    }
                    let first = branch.steps[0].identifier.clone();
                    let last = branch.steps[branch.steps.len() - 1].identifier.clone();
                    (first, last)
                }
                _ => {
                    let placeholder =
                        format!("{}{}", slot_identifier(step, slot), PLACEHOLDER_SUFFIX);
                    (placeholder.clone(), placeholder)
                }
            };

            edges.push(VisualizationEdge::new(
                &step.identifier,
                &first,
                EdgeKind::BranchEntry,
            ));
            if let Some(target) = merge_target {
                edges.push(VisualizationEdge::new(&last, target, EdgeKind::InsertAffordance));
            }
        }

        for branch in &step.branches {
            build_branch_edges(&branch.steps, edges);
        }
    }
}
