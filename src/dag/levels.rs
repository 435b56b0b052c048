// src/dag/levels.rs

//! Level assignment: the column a task is drawn in.
//!
//! `level(t) = 0` for a task without dependencies, otherwise
//! `1 + max(level(dep))`. Computed by memoized recursive descent; a dependency
//! that is still being computed (i.e. we walked around a cycle) counts as
//! level 0, which guarantees termination.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dag::graph::DagGraph;
use crate::types::NodeId;

/// Compute the level of every task in `graph`.
pub fn compute_levels(graph: &DagGraph) -> HashMap<NodeId, usize> {
    let mut memo: HashMap<NodeId, usize> = HashMap::with_capacity(graph.len());
    let mut in_progress: HashSet<NodeId> = HashSet::new();

    for id in graph.tasks() {
        level_of(graph, id, &mut memo, &mut in_progress);
    }

    memo
}

fn level_of(
    graph: &DagGraph,
    id: &str,
    memo: &mut HashMap<NodeId, usize>,
    in_progress: &mut HashSet<NodeId>,
) -> usize {
    if let Some(&level) = memo.get(id) {
        return level;
    }
    if !in_progress.insert(id.to_string()) {
        debug!(task = %id, "dependency cycle reached; treating revisited task as level 0");
        return 0;
    }

    let level = graph
        .dependencies_of(id)
        .iter()
        .map(|dep| level_of(graph, dep, memo, in_progress) + 1)
        .max()
        .unwrap_or(0);

    in_progress.remove(id);
    memo.insert(id.to_string(), level);
    level
}

/// Group task ids by level, keeping declaration order inside each level.
pub fn tasks_by_level(graph: &DagGraph, levels: &HashMap<NodeId, usize>) -> Vec<Vec<NodeId>> {
    let max_level = levels.values().copied().max().unwrap_or(0);
    let mut columns: Vec<Vec<NodeId>> = vec![Vec::new(); max_level + 1];
    for id in graph.tasks() {
        let level = levels.get(id).copied().unwrap_or(0);
        columns[level].push(id.to_string());
    }
    columns.retain(|c| !c.is_empty());
    columns
}
