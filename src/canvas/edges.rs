// src/canvas/edges.rs

//! SVG edge drawing and the layout-readiness retry loop.

use tracing::{debug, trace, warn};

use crate::canvas::frames::FrameTask;
use crate::canvas::geometry::{route, EdgePath};
use crate::canvas::index::NodeEntry;
use crate::canvas::WorkflowCanvas;
use crate::dom::{fmt_num, ElementId};
use crate::model::Connection;
use crate::render::style::status_color;
use crate::types::TaskStatus;

/// What a call to [`WorkflowCanvas::redraw_all_connections`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawOutcome {
    /// Layers were cleared and this many paths drawn.
    Drawn(usize),
    /// Nodes are not laid out yet; another attempt runs on the next frame.
    Deferred { attempt: u32 },
    /// Out of attempts (or no edge layer). Nothing was drawn.
    GaveUp,
}

impl WorkflowCanvas {
    /// Draw one edge from `from` to `to` into the edge layer.
    ///
    /// Returns `false`, without touching the document, if either endpoint is
    /// not registered or the edge layer is gone. Never changes task state.
    pub fn draw_connection(
        &mut self,
        from: &str,
        to: &str,
        animated: bool,
        label: Option<&str>,
    ) -> bool {
        let (Some(source), Some(target)) = (self.index.get(from), self.index.get(to)) else {
            debug!(from = %from, to = %to, "connection endpoint missing; skipping");
            return false;
        };

        let status = self.source_status(source);
        let path = route(source.rect(), target.rect());

        let Some(layer) = self.edge_layer() else {
            warn!("edge layer not found; cannot draw connections");
            return false;
        };

        let el = self.build_path(&path, from, to, status, animated);
        self.doc.append_child(layer, el);

        if let Some(text) = label {
            let mid = path.midpoint();
            let t = self.doc.create_svg_element("text");
            self.doc.add_class(t, "connection-label");
            self.doc.set_attr(t, "x", fmt_num(mid.x));
            self.doc.set_attr(t, "y", fmt_num(mid.y - 6.0));
            self.doc.set_attr(t, "text-anchor", "middle");
            self.doc.set_text(t, text);
            self.doc.append_child(layer, t);
        }

        trace!(from = %from, to = %to, style = path.style.as_str(), "connection drawn");
        true
    }

    /// Edge colour source: the task's own status, or a group's aggregate.
    fn source_status(&self, entry: &NodeEntry) -> TaskStatus {
        match entry {
            NodeEntry::Task(node) => node.task.status,
            NodeEntry::Group(group) => group.aggregate_status(|m| self.index.status_of(m)),
        }
    }

    fn build_path(
        &mut self,
        path: &EdgePath,
        from: &str,
        to: &str,
        status: TaskStatus,
        animated: bool,
    ) -> ElementId {
        let marker = self.marker_id(status);
        let el = self.doc.create_svg_element("path");
        self.doc.add_class(el, "connection");
        self.doc
            .add_class(el, &format!("connection-{}", path.style.as_str()));
        self.doc.add_class(el, &format!("edge-{}", status.as_str()));
        if animated {
            self.doc.add_class(el, "animated");
        }
        self.doc.set_attr(el, "d", path.d.clone());
        self.doc.set_attr(el, "fill", "none");
        self.doc.set_attr(el, "stroke", status_color(status));
        self.doc.set_attr(el, "stroke-width", "2");
        self.doc
            .set_attr(el, "marker-end", format!("url(#{marker})"));
        self.doc.set_attr(el, "data-from", from);
        self.doc.set_attr(el, "data-to", to);
        el
    }

    /// Clear the edge layer and draw every connection again.
    ///
    /// If some task card has not been laid out yet (measured width 0) the
    /// redraw is pushed to the next frame, at most
    /// `settings.max_redraw_attempts` times in total.
    pub fn redraw_all_connections(&mut self) -> RedrawOutcome {
        self.redraw_connections_attempt(0)
    }

    pub(super) fn redraw_connections_attempt(&mut self, attempt: u32) -> RedrawOutcome {
        if self.edge_layer().is_none() {
            warn!("edge layer not found; skipping connection redraw");
            return RedrawOutcome::GaveUp;
        }

        if !self.layout_ready() {
            let next = attempt + 1;
            if next < self.settings.max_redraw_attempts {
                debug!(attempt = next, "nodes not laid out yet; retrying redraw next frame");
                self.frames
                    .request_frame(FrameTask::RedrawConnections { attempt: next });
                return RedrawOutcome::Deferred { attempt: next };
            }
            warn!(
                attempts = self.settings.max_redraw_attempts,
                "nodes never reported a size; giving up on connection redraw"
            );
            return RedrawOutcome::GaveUp;
        }

        self.clear_edges();
        let connections: Vec<Connection> = self.connections.clone();
        let drawn = connections
            .iter()
            .filter(|c| self.draw_connection(&c.from, &c.to, c.animated, c.label.as_deref()))
            .count();
        debug!(drawn, total = connections.len(), "connections redrawn");
        RedrawOutcome::Drawn(drawn)
    }

    /// Remove drawn paths and labels; marker definitions stay.
    fn clear_edges(&mut self) {
        if let Some(layer) = self.edge_layer() {
            self.doc.retain_children(layer, |el| el.tag == "defs");
        }
    }

    /// Every task card reports a non-zero width.
    pub fn layout_ready(&self) -> bool {
        self.index.tasks().all(|node| {
            node.element()
                .map(|el| self.doc.offset_width(el) > 0.0)
                .unwrap_or(false)
        })
    }

    /// Path elements currently in the edge layer.
    pub fn drawn_paths(&self) -> Vec<ElementId> {
        let Some(layer) = self
            .edge_layer
            .filter(|l| self.doc.is_connected(*l))
        else {
            return Vec::new();
        };
        self.doc
            .children(layer)
            .iter()
            .copied()
            .filter(|c| self.doc.get(*c).tag == "path")
            .collect()
    }
}
