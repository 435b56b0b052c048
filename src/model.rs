// src/model.rs

//! Canvas-owned runtime records.
//!
//! The data file is read-only input; the canvas copies each [`TaskSpec`]
//! into a [`Task`] and mutates only its own copy.

use serde::{Deserialize, Serialize};

use crate::config::model::TaskSpec;
use crate::types::{Category, NodeId, Point, TaskStatus};

/// Mutable task record held by the canvas index.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: NodeId,
    pub title: String,
    pub category: Category,
    pub status: TaskStatus,
    pub description: String,
    pub details: Vec<String>,
    pub position: Point,
    pub dependencies: Vec<NodeId>,
    pub group: Option<NodeId>,
}

impl Task {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: Category::Generic,
            status: TaskStatus::Pending,
            description: String::new(),
            details: Vec::new(),
            position: Point::default(),
            dependencies: Vec::new(),
            group: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&TaskSpec> for Task {
    fn from(spec: &TaskSpec) -> Self {
        Self {
            id: spec.id.clone(),
            title: spec.title.clone(),
            category: spec.category,
            status: TaskStatus::parse_lenient(&spec.status),
            description: spec.description.clone(),
            details: spec.details.clone(),
            position: spec.position,
            dependencies: spec.dependencies.clone(),
            group: spec.group.clone(),
        }
    }
}

/// A directed edge between two task/group ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub label: Option<String>,
    /// `true` for edges derived from task dependencies, `false` for edges
    /// added explicitly.
    #[serde(default)]
    pub derived: bool,
}

impl Connection {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            animated: false,
            label: None,
            derived: false,
        }
    }
}

/// Member status counts of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupProgress {
    pub completed: usize,
    pub running: usize,
    pub failed: usize,
    pub total: usize,
    /// `completed * 100 / total`, rounded down; 0 for an empty group.
    pub percentage: u8,
}
