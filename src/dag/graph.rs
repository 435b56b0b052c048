// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::config::model::TaskSpec;
use crate::types::NodeId;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Declared dependencies that exist in the graph, in declaration order.
    deps: Vec<NodeId>,
    /// Tasks that list this one as a dependency.
    dependents: Vec<NodeId>,
}

/// In-memory dependency graph keyed by task id.
///
/// Dangling dependency ids are dropped at construction, so every id returned
/// by [`DagGraph::dependencies_of`] is a node of this graph. Cycles are kept
/// as declared.
#[derive(Debug, Clone, Default)]
pub struct DagGraph {
    order: Vec<NodeId>,
    nodes: HashMap<NodeId, DagNode>,
}

impl DagGraph {
    /// Build from `(id, dependencies)` pairs, preserving declaration order.
    pub fn from_edges<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [NodeId])>,
    {
        let entries: Vec<(&str, &[NodeId])> = entries.into_iter().collect();
        let mut graph = DagGraph::default();

        for (id, _) in &entries {
            if !graph.nodes.contains_key(*id) {
                graph.order.push(id.to_string());
                graph.nodes.insert(id.to_string(), DagNode::default());
            }
        }

        for (id, deps) in &entries {
            for dep in deps.iter() {
                if !graph.nodes.contains_key(dep) {
                    continue;
                }
                if let Some(node) = graph.nodes.get_mut(*id) {
                    if !node.deps.contains(dep) {
                        node.deps.push(dep.clone());
                    }
                }
                if let Some(dep_node) = graph.nodes.get_mut(dep) {
                    if !dep_node.dependents.iter().any(|d| d.as_str() == *id) {
                        dep_node.dependents.push(id.to_string());
                    }
                }
            }
        }

        graph
    }

    pub fn from_specs(specs: &[TaskSpec]) -> Self {
        Self::from_edges(
            specs
                .iter()
                .map(|s| (s.id.as_str(), s.dependencies.as_slice())),
        )
    }

    /// Task ids in declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks without dependencies.
    pub fn roots(&self) -> Vec<NodeId> {
        self.tasks()
            .filter(|id| self.dependencies_of(id).is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `(dependency, dependent)` pairs, in declaration order of the dependent.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.order
            .iter()
            .flat_map(|id| {
                self.dependencies_of(id)
                    .iter()
                    .map(move |dep| (dep.clone(), id.clone()))
            })
            .collect()
    }

    /// [`DagGraph::edges`] without the edges implied by a longer path
    /// (transitive reduction). A task depending on both `a` and `b`, where
    /// `b` already depends on `a`, only keeps `b -> task`.
    ///
    /// Cyclic graphs have no unique reduction; they get every edge.
    pub fn reduced_edges(&self) -> Vec<(NodeId, NodeId)> {
        let edges = self.edges();
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for id in self.tasks() {
            graph.add_node(id);
            for dep in self.dependencies_of(id) {
                graph.add_edge(dep.as_str(), id, ());
            }
        }
        if toposort(&graph, None).is_err() {
            return edges;
        }

        edges
            .iter()
            .filter(|(from, to)| {
                !self
                    .dependencies_of(to)
                    .iter()
                    .filter(|other| *other != from)
                    .any(|other| has_path_connecting(&graph, from.as_str(), other.as_str(), None))
            })
            .cloned()
            .collect()
    }
}
