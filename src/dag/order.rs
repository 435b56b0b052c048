// src/dag/order.rs

//! Cosmetic execution order: depth-first post-order over dependency lists.

use std::collections::HashSet;

use crate::dag::graph::DagGraph;
use crate::types::NodeId;

/// Visit every task after its dependencies.
///
/// Roots are taken in declaration order, dependencies in their declared
/// order. A task is emitted once; on a cycle the revisited task is simply
/// skipped, so every task still appears exactly once.
pub fn execution_order(graph: &DagGraph) -> Vec<NodeId> {
    let mut visited: HashSet<&str> = HashSet::with_capacity(graph.len());
    let mut order = Vec::with_capacity(graph.len());

    for id in graph.tasks() {
        visit(graph, id, &mut visited, &mut order);
    }

    order
}

fn visit<'g>(
    graph: &'g DagGraph,
    id: &'g str,
    visited: &mut HashSet<&'g str>,
    order: &mut Vec<NodeId>,
) {
    if !visited.insert(id) {
        return;
    }
    for dep in graph.dependencies_of(id) {
        visit(graph, dep, visited, order);
    }
    order.push(id.to_string());
}
