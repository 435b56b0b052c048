// src/canvas/workflow.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::canvas::frames::{FrameScheduler, FrameTask, FRAME};
use crate::canvas::index::{NodeEntry, NodeIndex};
use crate::canvas::interaction::DragMode;
use crate::canvas::viewport::Viewport;
use crate::config::model::CanvasSettings;
use crate::dom::{px, Document, ElementId};
use crate::errors::{DagfolioError, Result};
use crate::events::{StatusBus, StatusChanged};
use crate::model::{Connection, GroupProgress, Task};
use crate::render::style::status_color;
use crate::render::{GroupNode, TaskNode};
use crate::services::{CanvasServices, FocusTrap};
use crate::types::{NodeId, TaskStatus};

/// An open "view details" dialog and its focus trap.
#[derive(Debug, Clone)]
pub(super) struct DetailsModal {
    pub(super) task: NodeId,
    pub(super) element: ElementId,
    pub(super) trap: Option<FocusTrap>,
}

/// The DAG canvas: node index, connections, viewport and the two layers
/// (HTML nodes, SVG edges) inside one container element.
///
/// Every geometry change ends in a connection redraw, and both layers always
/// carry the same transform string.
#[derive(Debug)]
pub struct WorkflowCanvas {
    pub(super) doc: Document,
    pub(super) container_id: String,
    pub(super) container: ElementId,
    pub(super) node_layer: Option<ElementId>,
    pub(super) edge_layer: Option<ElementId>,
    pub(super) modal: Option<DetailsModal>,
    pub(super) index: NodeIndex,
    pub(super) connections: Vec<Connection>,
    pub(super) viewport: Viewport,
    pub(super) drag: DragMode,
    pub(super) frames: FrameScheduler,
    pub(super) settings: CanvasSettings,
    pub(super) bus: StatusBus,
    pub(super) services: Arc<dyn CanvasServices>,
}

impl WorkflowCanvas {
    /// Mount a canvas on the element with id `container_id`.
    ///
    /// Fails with [`DagfolioError::MissingContainer`] if there is no such
    /// element. Existing layers inside the container (pre-rendered markup)
    /// are reused.
    pub fn new(
        mut doc: Document,
        container_id: &str,
        settings: CanvasSettings,
        services: Arc<dyn CanvasServices>,
    ) -> Result<Self> {
        let container = doc
            .get_element_by_id(container_id)
            .ok_or_else(|| DagfolioError::MissingContainer(container_id.to_string()))?;

        doc.add_class(container, "workflow-canvas");
        doc.set_attr(container, "role", "application");
        doc.set_attr(container, "aria-label", "Resume DAG");
        doc.set_style(container, "position", "relative");
        doc.set_style(container, "overflow", "hidden");
        doc.set_style(container, "width", px(settings.width));
        doc.set_style(container, "height", px(settings.height));

        let mut canvas = Self {
            doc,
            container_id: container_id.to_string(),
            container,
            node_layer: None,
            edge_layer: None,
            modal: None,
            index: NodeIndex::default(),
            connections: Vec::new(),
            viewport: Viewport::new(settings.min_scale, settings.max_scale),
            drag: DragMode::Idle,
            frames: FrameScheduler::default(),
            settings,
            bus: StatusBus::default(),
            services,
        };
        canvas.mount_layers();
        canvas.update_canvas_transform();
        info!(container = %container_id, "workflow canvas mounted");
        Ok(canvas)
    }

    fn node_layer_id(&self) -> String {
        format!("{}-nodes", self.container_id)
    }

    fn edge_layer_id(&self) -> String {
        format!("{}-edges", self.container_id)
    }

    pub(super) fn marker_id(&self, status: TaskStatus) -> String {
        format!("{}-arrow-{}", self.container_id, status.as_str())
    }

    fn mount_layers(&mut self) {
        if self.doc.get_element_by_id(&self.edge_layer_id()).is_none() {
            let svg = self.doc.create_svg_element("svg");
            self.doc.set_id(svg, &self.edge_layer_id());
            self.doc.add_class(svg, "canvas-edges");
            self.doc.set_attr(svg, "xmlns", "http://www.w3.org/2000/svg");
            self.doc.set_attr(svg, "aria-hidden", "true");
            self.doc.set_style(svg, "position", "absolute");
            self.doc.set_style(svg, "overflow", "visible");
            self.doc.set_style(svg, "transform-origin", "0 0");

            let defs = self.doc.create_svg_element("defs");
            for status in TaskStatus::ALL {
                let marker = self.doc.create_svg_element("marker");
                self.doc.set_id(marker, &self.marker_id(status));
                self.doc.set_attr(marker, "viewBox", "0 0 10 10");
                self.doc.set_attr(marker, "refX", "10");
                self.doc.set_attr(marker, "refY", "5");
                self.doc.set_attr(marker, "markerWidth", "6");
                self.doc.set_attr(marker, "markerHeight", "6");
                self.doc.set_attr(marker, "orient", "auto");
                let head = self.doc.create_svg_element("path");
                self.doc.set_attr(head, "d", "M 0 0 L 10 5 L 0 10 z");
                self.doc.set_attr(head, "fill", status_color(status));
                self.doc.append_child(marker, head);
                self.doc.append_child(defs, marker);
            }
            self.doc.append_child(svg, defs);
            self.doc.append_child(self.container, svg);
        }

        if self.doc.get_element_by_id(&self.node_layer_id()).is_none() {
            let layer = self.doc.create_element("div");
            self.doc.set_id(layer, &self.node_layer_id());
            self.doc.add_class(layer, "canvas-nodes");
            self.doc.set_style(layer, "position", "absolute");
            self.doc.set_style(layer, "transform-origin", "0 0");
            self.doc.append_child(self.container, layer);
        }

        self.node_layer = self.doc.get_element_by_id(&self.node_layer_id());
        self.edge_layer = self.doc.get_element_by_id(&self.edge_layer_id());
    }

    /// Cached node layer, re-queried once from the document if the cached
    /// handle is missing or detached.
    pub(super) fn node_layer(&mut self) -> Option<ElementId> {
        if let Some(layer) = self.node_layer {
            if self.doc.is_connected(layer) {
                return Some(layer);
            }
        }
        self.node_layer = self.doc.get_element_by_id(&self.node_layer_id());
        self.node_layer
    }

    pub(super) fn edge_layer(&mut self) -> Option<ElementId> {
        if let Some(layer) = self.edge_layer {
            if self.doc.is_connected(layer) {
                return Some(layer);
            }
        }
        self.edge_layer = self.doc.get_element_by_id(&self.edge_layer_id());
        self.edge_layer
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Give the document back (e.g. for serialization).
    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn status_bus(&self) -> &StatusBus {
        &self.bus
    }

    pub fn services(&self) -> &Arc<dyn CanvasServices> {
        &self.services
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.index.task(id).map(|n| &n.task)
    }

    pub fn task_status(&self, id: &str) -> Option<TaskStatus> {
        self.index.status_of(id)
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Register a task at `(x, y)` and append its card to the node layer.
    ///
    /// Re-adding an id replaces the previous node. Connections are not
    /// redrawn here.
    pub fn add_task(&mut self, task: Task, x: f64, y: f64) -> ElementId {
        let id = task.id.clone();
        if let Some(old) = self.index.get(&id).and_then(NodeEntry::element) {
            debug!(task = %id, "replacing existing node");
            if let Some(parent) = self.doc.get(old).parent {
                self.doc.remove_child(parent, old);
            }
        }

        let mut node = TaskNode::new(task);
        let el = node.render(&mut self.doc, x, y);

        match self.node_layer() {
            Some(layer) => self.doc.append_child(layer, el),
            None => warn!(task = %id, "node layer not found; task registered without a visible card"),
        }

        self.index.insert(NodeEntry::Task(node));
        for group in self.index.groups_containing(&id) {
            self.refresh_group(&group);
        }
        debug!(task = %id, x, y, "task added to canvas");
        el
    }

    /// Register a group at `(x, y)` and append its card to the node layer.
    pub fn add_group(&mut self, mut group: GroupNode, x: f64, y: f64) -> ElementId {
        let id = group.id.clone();
        if let Some(old) = self.index.get(&id).and_then(NodeEntry::element) {
            debug!(group = %id, "replacing existing node");
            if let Some(parent) = self.doc.get(old).parent {
                self.doc.remove_child(parent, old);
            }
        }
        let titles: Vec<(NodeId, String)> = group
            .members
            .iter()
            .filter_map(|m| self.index.task(m).map(|t| (m.clone(), t.task.title.clone())))
            .collect();
        let el = group.render(&mut self.doc, x, y, &titles);

        match self.node_layer() {
            Some(layer) => self.doc.append_child(layer, el),
            None => warn!(group = %id, "node layer not found; group registered without a visible card"),
        }

        self.index.insert(NodeEntry::Group(group));
        self.refresh_group(&id);
        debug!(group = %id, x, y, "group added to canvas");
        el
    }

    /// Queue a connection. Drawing happens on the next redraw.
    pub fn add_connection(
        &mut self,
        from: &str,
        to: &str,
        animated: bool,
        label: Option<&str>,
    ) {
        self.push_connection(Connection {
            from: from.to_string(),
            to: to.to_string(),
            animated,
            label: label.map(str::to_string),
            derived: false,
        });
    }

    pub(super) fn push_connection(&mut self, connection: Connection) {
        if self
            .connections
            .iter()
            .any(|c| c.from == connection.from && c.to == connection.to)
        {
            debug!(from = %connection.from, to = %connection.to, "duplicate connection ignored");
            return;
        }
        self.connections.push(connection);
    }

    /// Derive `dep -> task` connections from the declared dependencies.
    ///
    /// Edges implied by a longer chain are left out, so `skills[edu, exp]`
    /// after `exp[edu]` only gets `exp -> skills`. Unknown dependency ids
    /// produce no connection.
    pub fn connect_dependencies(&mut self) -> usize {
        let edges = self.dependency_graph().reduced_edges();

        let before = self.connections.len();
        for (from, to) in edges {
            self.push_connection(Connection {
                from,
                to,
                animated: false,
                label: None,
                derived: true,
            });
        }
        self.connections.len() - before
    }

    // ---------------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------------

    /// Move a task along the status state machine.
    ///
    /// Invalid transitions are logged and refused. On success the change is
    /// published on the status bus, owning groups are refreshed and edges
    /// are redrawn (edge colour follows the source status).
    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> bool {
        let Some(current) = self.index.status_of(id) else {
            warn!(task = %id, "status change for unknown task; ignoring");
            return false;
        };
        if current == status {
            return true;
        }
        if !current.can_transition_to(status) {
            warn!(task = %id, from = %current, to = %status, "invalid status transition; ignoring");
            return false;
        }
        self.apply_status(id, status);
        true
    }

    /// Apply a status without checking the state machine (reset, restore).
    pub fn force_task_status(&mut self, id: &str, status: TaskStatus) -> bool {
        if !self.index.contains(id) {
            return false;
        }
        if self.index.status_of(id) != Some(status) {
            self.apply_status(id, status);
        }
        true
    }

    /// Apply a status given as a string, as the UI does. Unknown strings only
    /// restyle the card.
    pub fn update_task_status_str(&mut self, id: &str, raw: &str) -> Option<TaskStatus> {
        match raw.parse::<TaskStatus>() {
            Ok(status) => self.set_task_status(id, status).then_some(status),
            Err(_) => {
                let node = self.index.task_mut(id)?;
                node.update_status(&mut self.doc, raw)
            }
        }
    }

    fn apply_status(&mut self, id: &str, status: TaskStatus) {
        let Some(node) = self.index.task_mut(id) else {
            return;
        };
        let from = node.task.status;
        node.set_status(&mut self.doc, status);
        let event = StatusChanged {
            task: id.to_string(),
            title: node.task.title.clone(),
            from,
            to: status,
        };
        debug!(task = %id, %from, to = %status, "task status changed");
        self.bus.publish(event);

        for group in self.index.groups_containing(id) {
            self.refresh_group(&group);
        }
        self.redraw_all_connections();
    }

    /// Put every task back to pending.
    pub fn reset_statuses(&mut self) {
        for id in self.index.task_ids() {
            self.force_task_status(&id, TaskStatus::Pending);
        }
        info!("all task statuses reset to pending");
    }

    /// Manual click-to-run: a pending task starts running.
    pub fn run_task(&mut self, id: &str) -> bool {
        self.set_task_status(id, TaskStatus::Running)
    }

    // ---------------------------------------------------------------------
    // Groups
    // ---------------------------------------------------------------------

    /// Recompute a group's bounds, aggregated status and progress.
    pub fn refresh_group(&mut self, id: &str) {
        let Some(group) = self.index.group(id) else {
            return;
        };
        let positions: Vec<_> = group
            .members
            .iter()
            .filter_map(|m| self.index.task(m).map(|t| t.task.position))
            .collect();
        let index = &self.index;
        let progress = group.progress(|m| index.status_of(m));
        let status = group.aggregate_status(|m| index.status_of(m));

        if let Some(group) = self.index.group_mut(id) {
            group.recompute_bounds(positions);
            group.update_status_badge(&mut self.doc, status, progress);
        }
    }

    pub fn group_progress(&self, id: &str) -> Option<GroupProgress> {
        let group = self.index.group(id)?;
        Some(group.progress(|m| self.index.status_of(m)))
    }

    pub fn group_status(&self, id: &str) -> Option<TaskStatus> {
        let group = self.index.group(id)?;
        Some(group.aggregate_status(|m| self.index.status_of(m)))
    }

    /// Expand or collapse one group. Edges are redrawn on the next frame,
    /// once the resized card has been laid out.
    pub fn toggle_group(&mut self, id: &str) -> bool {
        let Some(group) = self.index.group_mut(id) else {
            warn!(group = %id, "toggle for unknown group; ignoring");
            return false;
        };
        let duration = group.toggle(&mut self.doc);
        let expanded = group.expanded;
        self.frames
            .schedule_after(duration, FrameTask::FinishGroupTransition(id.to_string()));
        self.frames
            .request_frame(FrameTask::RedrawConnections { attempt: 0 });
        debug!(group = %id, expanded, "group toggled");
        true
    }

    /// Collapse every group if any is expanded, otherwise expand them all.
    pub fn toggle_groups(&mut self) {
        let ids = self.index.group_ids();
        let any_expanded = self.index.groups().any(|g| g.expanded);
        for id in ids {
            let expanded = self.index.group(&id).map(|g| g.expanded).unwrap_or(false);
            if expanded == any_expanded {
                self.toggle_group(&id);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Details dialog
    // ---------------------------------------------------------------------

    /// Toggle the inline detail panel of a task card.
    pub fn toggle_task_details(&mut self, id: &str) -> Option<bool> {
        let node = self.index.task_mut(id)?;
        let open = node.toggle_details(&mut self.doc);
        self.frames
            .request_frame(FrameTask::RedrawConnections { attempt: 0 });
        Some(open)
    }

    /// Open a modal dialog with the task's details and trap focus inside it.
    pub fn open_details(&mut self, id: &str) -> Option<ElementId> {
        let task = self.index.task(id)?.task.clone();
        self.close_details();

        let dialog = self.doc.create_element("div");
        let title_id = format!("{}-details-title", self.container_id);
        self.doc.set_id(dialog, &format!("{}-details", self.container_id));
        self.doc.add_class(dialog, "details-modal");
        self.doc.set_attr(dialog, "role", "dialog");
        self.doc.set_attr(dialog, "aria-modal", "true");
        self.doc.set_attr(dialog, "aria-labelledby", title_id.clone());

        let heading = self.doc.create_element("h2");
        self.doc.set_id(heading, &title_id);
        self.doc.set_text(heading, task.title.clone());
        self.doc.append_child(dialog, heading);

        let status = self.doc.create_element("p");
        self.doc.add_class(status, "details-status");
        self.doc.set_text(status, format!("Status: {}", task.status));
        self.doc.append_child(dialog, status);

        if !task.description.is_empty() {
            let p = self.doc.create_element("p");
            self.doc.set_text(p, task.description.clone());
            self.doc.append_child(dialog, p);
        }
        if !task.details.is_empty() {
            let ul = self.doc.create_element("ul");
            for line in &task.details {
                let li = self.doc.create_element("li");
                self.doc.set_text(li, line.clone());
                self.doc.append_child(ul, li);
            }
            self.doc.append_child(dialog, ul);
        }

        let close = self.doc.create_element("button");
        self.doc.set_attr(close, "type", "button");
        self.doc.set_attr(close, "data-action", "close-details");
        self.doc.set_text(close, "Close");
        self.doc.append_child(dialog, close);

        self.doc.append_child(self.container, dialog);
        let trap = FocusTrap::new(FocusTrap::focusables(&self.doc, dialog));
        self.modal = Some(DetailsModal {
            task: id.to_string(),
            element: dialog,
            trap,
        });
        self.services
            .announce(&format!("Details for {} opened", task.title));
        Some(dialog)
    }

    pub fn close_details(&mut self) -> bool {
        let Some(modal) = self.modal.take() else {
            return false;
        };
        self.doc.remove_child(self.container, modal.element);
        debug!(task = %modal.task, "details dialog closed");
        true
    }

    pub fn details_open_for(&self) -> Option<&str> {
        self.modal.as_ref().map(|m| m.task.as_str())
    }

    /// Move focus inside the open dialog (Tab / Shift+Tab).
    pub fn cycle_details_focus(&mut self, backwards: bool) -> Option<ElementId> {
        let trap = self.modal.as_mut()?.trap.as_mut()?;
        Some(if backwards {
            trap.focus_prev()
        } else {
            trap.focus_next()
        })
    }

    /// Dispatch a card button (`data-action`) for a node.
    pub fn handle_node_action(&mut self, id: &str, action: &str) -> bool {
        match action {
            "details" => self.open_details(id).is_some(),
            "logs" => self.toggle_task_details(id).is_some(),
            "run" => self.run_task(id),
            "toggle-group" => self.toggle_group(id),
            other => {
                warn!(node = %id, action = %other, "unknown node action; ignoring");
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Frames
    // ---------------------------------------------------------------------

    /// Advance virtual time by `elapsed`, run a layout pass and then every
    /// frame task that is due. Returns how many tasks ran.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let started = Instant::now();
        let due = self.frames.advance(elapsed);
        self.doc.layout();

        let count = due.len();
        for task in due {
            match task {
                FrameTask::RedrawConnections { attempt } => {
                    self.redraw_connections_attempt(attempt);
                }
                FrameTask::FinishGroupTransition(id) => {
                    if let Some(group) = self.index.group_mut(&id) {
                        group.finish_transition(&mut self.doc);
                    }
                }
            }
        }

        self.services.record_frame(started.elapsed());
        count
    }

    /// Tick frame by frame until nothing is pending, at most `max_frames`
    /// times. Returns the number of frames run.
    pub fn run_pending_frames(&mut self, max_frames: u32) -> u32 {
        let mut frames = 0;
        while self.frames.has_pending() && frames < max_frames {
            self.tick(FRAME);
            frames += 1;
        }
        frames
    }

    pub fn has_pending_frames(&self) -> bool {
        self.frames.has_pending()
    }
}
