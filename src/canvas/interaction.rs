// src/canvas/interaction.rs

//! Viewport changes and pointer handling: transform sync, zoom, drag, pan,
//! auto layout and fitting.

use std::time::Instant;

use tracing::{debug, info, trace};

use crate::canvas::frames::FrameTask;
use crate::canvas::index::NodeEntry;
use crate::canvas::layout::{center_pan, fit_scale, plan_layout, task_bounds, LayoutPlan};
use crate::canvas::{RedrawOutcome, WorkflowCanvas, TRANSFORM_REDRAW_DELAY};
use crate::dag::DagGraph;
use crate::dom::ElementId;
use crate::types::{NodeId, Point};

/// The single active pointer gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    /// Moving one node; `last` is the previous pointer position on screen.
    Node { id: NodeId, last: Point },
    /// Panning the whole canvas.
    Pan { last: Point },
}

impl WorkflowCanvas {
    pub fn viewport(&self) -> &crate::canvas::Viewport {
        &self.viewport
    }

    pub fn drag_mode(&self) -> &DragMode {
        &self.drag
    }

    /// Transform strings currently applied to the node and edge layers.
    pub fn layer_transforms(&self) -> (Option<String>, Option<String>) {
        let get = |layer: Option<ElementId>| {
            layer.and_then(|l| self.doc.style(l, "transform").map(str::to_string))
        };
        (get(self.node_layer), get(self.edge_layer))
    }

    /// Write the viewport transform to both layers, then schedule a
    /// connection redraw shortly after.
    pub fn update_canvas_transform(&mut self) {
        let transform = self.viewport.transform();
        let layers = [self.node_layer(), self.edge_layer()];
        for layer in layers.into_iter().flatten() {
            self.doc.set_style(layer, "transform", transform.clone());
        }
        trace!(%transform, "canvas transform updated");
        self.frames.schedule_after(
            TRANSFORM_REDRAW_DELAY,
            FrameTask::RedrawConnections { attempt: 0 },
        );
    }

    /// Replace scale and pan at once (scale is clamped).
    pub fn set_viewport(&mut self, scale: f64, pan: Point) {
        self.viewport.set_scale(scale);
        self.viewport.set_pan(pan);
        self.update_canvas_transform();
    }

    /// Visible canvas centre in screen coordinates.
    pub fn canvas_center(&self) -> Point {
        Point::new(self.settings.width / 2.0, self.settings.height / 2.0)
    }

    /// Multiply the scale by `factor` around `center` (default: the canvas
    /// centre). Returns `false` if the scale was already at a bound.
    pub fn zoom(&mut self, factor: f64, center: Option<Point>) -> bool {
        let center = center.unwrap_or_else(|| self.canvas_center());
        if !self.viewport.zoom(factor, center) {
            trace!(factor, scale = self.viewport.scale(), "zoom had no effect");
            return false;
        }
        self.update_canvas_transform();
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom(self.settings.zoom_step, None)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom(1.0 / self.settings.zoom_step, None)
    }

    /// Mouse wheel: zoom around the pointer. Throttled through the injected
    /// services; returns `false` if the event was dropped or had no effect.
    pub fn on_wheel(&mut self, delta_y: f64, point: Point, now: Instant) -> bool {
        if delta_y == 0.0 || !self.services.throttle("wheel", now) {
            return false;
        }
        let factor = if delta_y < 0.0 {
            self.settings.zoom_step
        } else {
            1.0 / self.settings.zoom_step
        };
        self.zoom(factor, Some(point))
    }

    /// Id of the registered node whose card contains `target`, if any.
    pub fn node_at(&self, target: ElementId) -> Option<NodeId> {
        let mut current = Some(target);
        while let Some(el) = current {
            if let Some(id) = self.doc.attr(el, "data-node-id") {
                if self.index.contains(id) {
                    return Some(id.to_string());
                }
            }
            if el == self.container {
                return None;
            }
            current = self.doc.get(el).parent;
        }
        None
    }

    /// Begin a gesture. Pressing on a node starts a node drag, anywhere else
    /// starts a pan. Any gesture already running is replaced.
    pub fn pointer_down(&mut self, target: Option<ElementId>, point: Point) {
        self.drag = match target.and_then(|t| self.node_at(t)) {
            Some(id) => {
                debug!(node = %id, "node drag started");
                DragMode::Node { id, last: point }
            }
            None => DragMode::Pan { last: point },
        };
    }

    /// Continue the active gesture. Node drags divide the pointer delta by
    /// the scale and redraw edges immediately; pans use the raw delta.
    pub fn pointer_move(&mut self, point: Point) {
        match std::mem::take(&mut self.drag) {
            DragMode::Idle => {}
            DragMode::Node { id, last } => {
                let scale = self.viewport.scale();
                let dx = (point.x - last.x) / scale;
                let dy = (point.y - last.y) / scale;
                if let Some(pos) = self.index.get(&id).map(NodeEntry::position) {
                    self.move_node(&id, pos.x + dx, pos.y + dy);
                }
                self.drag = DragMode::Node { id, last: point };
            }
            DragMode::Pan { last } => {
                self.viewport.pan_by(point.x - last.x, point.y - last.y);
                self.update_canvas_transform();
                self.drag = DragMode::Pan { last: point };
            }
        }
    }

    /// End whichever gesture is active.
    pub fn pointer_up(&mut self) {
        if let DragMode::Node { id, .. } = std::mem::take(&mut self.drag) {
            debug!(node = %id, "node drag finished");
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Move a task or group card and redraw connections.
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.index.get_mut(id) {
            Some(NodeEntry::Task(node)) => node.update_position(&mut self.doc, x, y),
            Some(NodeEntry::Group(group)) => group.update_position(&mut self.doc, x, y),
            None => return false,
        }
        for group in self.index.groups_containing(id) {
            self.refresh_group(&group);
        }
        self.redraw_all_connections();
        true
    }

    /// Dependency graph of the registered tasks, in registration order.
    pub fn dependency_graph(&self) -> DagGraph {
        DagGraph::from_edges(
            self.index
                .tasks()
                .map(|n| (n.task.id.as_str(), n.task.dependencies.as_slice())),
        )
    }

    /// Place tasks by level and groups in rows below them, then redraw.
    pub fn auto_layout_tasks(&mut self) -> LayoutPlan {
        let graph = self.dependency_graph();
        let groups: Vec<(NodeId, f64)> = self
            .index
            .groups()
            .map(|g| (g.id.clone(), g.height()))
            .collect();

        let plan = plan_layout(&graph, &groups);
        for (id, p) in &plan.tasks {
            if let Some(node) = self.index.task_mut(id) {
                node.update_position(&mut self.doc, p.x, p.y);
            }
        }
        for (id, p) in &plan.groups {
            if let Some(group) = self.index.group_mut(id) {
                group.update_position(&mut self.doc, p.x, p.y);
            }
        }
        for id in self.index.group_ids() {
            self.refresh_group(&id);
        }
        info!(tasks = plan.tasks.len(), groups = plan.groups.len(), "auto layout applied");
        self.redraw_all_connections();
        plan
    }

    fn task_positions(&self) -> Vec<Point> {
        self.index.tasks().map(|n| n.task.position).collect()
    }

    /// Scale and centre the DAG to fit the visible area. Returns `false` on
    /// an empty canvas.
    pub fn fit_to_screen(&mut self) -> bool {
        let Some(bounds) = task_bounds(self.task_positions()) else {
            return false;
        };
        let (min, max) = self.viewport.bounds();
        let scale = fit_scale(bounds, self.settings.width, self.settings.height, min, max);
        self.viewport.set_scale(scale);
        self.viewport.set_pan(center_pan(
            bounds,
            self.settings.width,
            self.settings.height,
            self.viewport.scale(),
        ));
        debug!(scale = self.viewport.scale(), "fit to screen");
        self.update_canvas_transform();
        true
    }

    /// Centre the DAG without changing the scale.
    pub fn center_dag(&mut self) -> bool {
        let Some(bounds) = task_bounds(self.task_positions()) else {
            return false;
        };
        self.viewport.set_pan(center_pan(
            bounds,
            self.settings.width,
            self.settings.height,
            self.viewport.scale(),
        ));
        self.update_canvas_transform();
        true
    }

    /// Re-sync groups, transform and edges with the index.
    pub fn refresh(&mut self) -> RedrawOutcome {
        for id in self.index.group_ids() {
            self.refresh_group(&id);
        }
        self.update_canvas_transform();
        self.redraw_all_connections()
    }
}
