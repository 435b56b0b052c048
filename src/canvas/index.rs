// src/canvas/index.rs

//! The canvas node index: one tagged entry per task or group id.

use std::collections::HashMap;

use crate::dom::ElementId;
use crate::render::style::{TASK_HEIGHT, TASK_WIDTH};
use crate::render::{GroupNode, TaskNode};
use crate::types::{NodeId, NodeKind, Point, Rect, TaskStatus};

#[derive(Debug, Clone)]
pub enum NodeEntry {
    Task(TaskNode),
    Group(GroupNode),
}

impl NodeEntry {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeEntry::Task(_) => NodeKind::Task,
            NodeEntry::Group(_) => NodeKind::Group,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            NodeEntry::Task(node) => node.id(),
            NodeEntry::Group(group) => &group.id,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            NodeEntry::Task(node) => node.task.position,
            NodeEntry::Group(group) => group.position,
        }
    }

    /// Box used for anchors: nominal size for tasks, stored size for groups.
    pub fn rect(&self) -> Rect {
        let p = self.position();
        match self {
            NodeEntry::Task(_) => Rect::new(p.x, p.y, TASK_WIDTH, TASK_HEIGHT),
            NodeEntry::Group(group) => Rect::new(p.x, p.y, group.width(), group.height()),
        }
    }

    pub fn element(&self) -> Option<ElementId> {
        match self {
            NodeEntry::Task(node) => node.element(),
            NodeEntry::Group(group) => group.element(),
        }
    }
}

/// Id-keyed store that also remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    order: Vec<NodeId>,
    entries: HashMap<NodeId, NodeEntry>,
}

impl NodeIndex {
    /// Insert or replace. A replaced entry keeps its original slot.
    pub fn insert(&mut self, entry: NodeEntry) -> Option<NodeEntry> {
        let id = entry.id().to_string();
        let previous = self.entries.insert(id.clone(), entry);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn get(&self, id: &str) -> Option<&NodeEntry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut NodeEntry> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn task(&self, id: &str) -> Option<&TaskNode> {
        match self.entries.get(id)? {
            NodeEntry::Task(node) => Some(node),
            NodeEntry::Group(_) => None,
        }
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut TaskNode> {
        match self.entries.get_mut(id)? {
            NodeEntry::Task(node) => Some(node),
            NodeEntry::Group(_) => None,
        }
    }

    pub fn group(&self, id: &str) -> Option<&GroupNode> {
        match self.entries.get(id)? {
            NodeEntry::Group(group) => Some(group),
            NodeEntry::Task(_) => None,
        }
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut GroupNode> {
        match self.entries.get_mut(id)? {
            NodeEntry::Group(group) => Some(group),
            NodeEntry::Task(_) => None,
        }
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &TaskNode> {
        self.order.iter().filter_map(|id| self.task(id))
    }

    /// Groups in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupNode> {
        self.order.iter().filter_map(|id| self.group(id))
    }

    pub fn task_ids(&self) -> Vec<NodeId> {
        self.tasks().map(|t| t.id().to_string()).collect()
    }

    pub fn group_ids(&self) -> Vec<NodeId> {
        self.groups().map(|g| g.id.clone()).collect()
    }

    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.task(id).map(|t| t.task.status)
    }

    /// Groups listing `task_id` as a member.
    pub fn groups_containing(&self, task_id: &str) -> Vec<NodeId> {
        self.groups()
            .filter(|g| g.members.iter().any(|m| m == task_id))
            .map(|g| g.id.clone())
            .collect()
    }
}
