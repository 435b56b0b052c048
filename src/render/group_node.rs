// src/render/group_node.rs

//! Group card renderer: a titled cluster of tasks with aggregated status.

use std::time::Duration;

use crate::config::model::GroupSpec;
use crate::dom::{px, Document, ElementId};
use crate::model::GroupProgress;
use crate::render::style::{
    status_label, GROUP_HEADER_HEIGHT, GROUP_PADDING, GROUP_ROW_HEIGHT, GROUP_WIDTH, TASK_HEIGHT,
    TASK_WIDTH,
};
use crate::types::{NodeId, Point, Rect, TaskStatus};

/// Length of the expand/collapse transition.
pub const GROUP_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct GroupNode {
    pub id: NodeId,
    pub title: String,
    pub members: Vec<NodeId>,
    pub expanded: bool,
    pub position: Point,
    /// Derived from member positions; `None` until computed or when no member
    /// is on the canvas.
    bounds: Option<Rect>,
    transitioning: bool,
    element: Option<ElementId>,
    body_el: Option<ElementId>,
    badge_el: Option<ElementId>,
    progress_el: Option<ElementId>,
}

impl GroupNode {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, members: Vec<NodeId>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            members,
            expanded: true,
            position: Point::default(),
            bounds: None,
            transitioning: false,
            element: None,
            body_el: None,
            badge_el: None,
            progress_el: None,
        }
    }

    pub fn from_spec(spec: &GroupSpec) -> Self {
        let mut group = Self::new(spec.id.clone(), spec.title.clone(), spec.member_ids());
        group.expanded = spec.expanded;
        group
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn dom_id(id: &str) -> String {
        format!("group-{id}")
    }

    pub fn width(&self) -> f64 {
        GROUP_WIDTH
    }

    /// Card height; grows by one row per member while expanded.
    pub fn height(&self) -> f64 {
        if self.expanded {
            GROUP_HEADER_HEIGHT + GROUP_ROW_HEIGHT * self.members.len() as f64
        } else {
            GROUP_HEADER_HEIGHT
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Build the card. `member_titles` supplies display names for the member
    /// list; ids without a title are shown verbatim.
    pub fn render(
        &mut self,
        doc: &mut Document,
        x: f64,
        y: f64,
        member_titles: &[(NodeId, String)],
    ) -> ElementId {
        if let Some(el) = self.element {
            return el;
        }

        let card = doc.create_element("div");
        doc.set_id(card, &Self::dom_id(&self.id));
        doc.add_class(card, "task-group");
        doc.set_attr(card, "data-node-id", self.id.clone());
        doc.set_attr(card, "role", "region");
        doc.set_attr(card, "aria-label", self.title.clone());
        doc.set_style(card, "position", "absolute");

        let header = doc.create_element("div");
        doc.add_class(header, "group-header");
        let toggle = doc.create_element("button");
        doc.add_class(toggle, "group-toggle");
        doc.set_attr(toggle, "type", "button");
        doc.set_attr(toggle, "data-action", "toggle-group");
        doc.set_attr(toggle, "data-node-id", self.id.clone());
        let title = doc.create_element("span");
        doc.add_class(title, "group-title");
        doc.set_text(title, self.title.clone());
        let badge = doc.create_element("span");
        doc.add_class(badge, "group-status");
        let progress = doc.create_element("div");
        doc.add_class(progress, "group-progress");
        doc.set_attr(progress, "role", "progressbar");
        doc.set_attr(progress, "aria-valuemin", "0");
        doc.set_attr(progress, "aria-valuemax", "100");
        doc.append_child(header, toggle);
        doc.append_child(header, title);
        doc.append_child(header, badge);
        doc.append_child(card, header);
        doc.append_child(card, progress);

        let body = doc.create_element("ul");
        doc.add_class(body, "group-members");
        for member in &self.members {
            let li = doc.create_element("li");
            doc.set_attr(li, "data-member-id", member.clone());
            let label = member_titles
                .iter()
                .find(|(id, _)| id == member)
                .map(|(_, t)| t.clone())
                .unwrap_or_else(|| member.clone());
            doc.set_text(li, label);
            doc.append_child(body, li);
        }
        doc.append_child(card, body);

        self.element = Some(card);
        self.body_el = Some(body);
        self.badge_el = Some(badge);
        self.progress_el = Some(progress);
        self.apply_expansion(doc);
        self.update_position(doc, x, y);
        card
    }

    pub fn update_position(&mut self, doc: &mut Document, x: f64, y: f64) {
        self.position = Point::new(x, y);
        if let Some(el) = self.element {
            doc.set_style(el, "left", px(x));
            doc.set_style(el, "top", px(y));
        }
    }

    /// Flip expanded/collapsed and start the transition.
    ///
    /// Returns how long the transition lasts; the caller schedules
    /// [`GroupNode::finish_transition`] after that.
    pub fn toggle(&mut self, doc: &mut Document) -> Duration {
        self.expanded = !self.expanded;
        self.transitioning = true;
        if let Some(el) = self.element {
            doc.add_class(el, "transitioning");
            doc.set_style(el, "transition", format!("height {}ms ease", GROUP_TRANSITION.as_millis()));
        }
        self.apply_expansion(doc);
        GROUP_TRANSITION
    }

    pub fn finish_transition(&mut self, doc: &mut Document) {
        self.transitioning = false;
        if let Some(el) = self.element {
            doc.remove_class(el, "transitioning");
        }
    }

    fn apply_expansion(&self, doc: &mut Document) {
        let Some(el) = self.element else {
            return;
        };
        doc.toggle_class(el, "expanded", self.expanded);
        doc.toggle_class(el, "collapsed", !self.expanded);
        doc.set_attr(el, "aria-expanded", self.expanded.to_string());
        doc.set_style(el, "width", px(self.width()));
        doc.set_style(el, "height", px(self.height()));
        if let Some(body) = self.body_el {
            doc.set_style(body, "display", if self.expanded { "block" } else { "none" });
        }
    }

    /// Count member statuses. Recomputed on every call; member statuses
    /// change behind the group's back.
    pub fn progress<F>(&self, status_of: F) -> GroupProgress
    where
        F: Fn(&str) -> Option<TaskStatus>,
    {
        let mut progress = GroupProgress::default();
        for member in &self.members {
            let Some(status) = status_of(member) else {
                continue;
            };
            progress.total += 1;
            match status {
                TaskStatus::Success => progress.completed += 1,
                TaskStatus::Running => progress.running += 1,
                TaskStatus::Failed => progress.failed += 1,
                TaskStatus::Pending => {}
            }
        }
        if progress.total > 0 {
            progress.percentage = (progress.completed * 100 / progress.total) as u8;
        }
        progress
    }

    /// `failed > running > success (all members) > pending`.
    pub fn aggregate_status<F>(&self, status_of: F) -> TaskStatus
    where
        F: Fn(&str) -> Option<TaskStatus>,
    {
        let p = self.progress(status_of);
        if p.failed > 0 {
            TaskStatus::Failed
        } else if p.running > 0 {
            TaskStatus::Running
        } else if p.total > 0 && p.completed == p.total {
            TaskStatus::Success
        } else {
            TaskStatus::Pending
        }
    }

    /// Recompute the member bounding box from current member positions.
    pub fn recompute_bounds<I>(&mut self, member_positions: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Point>,
    {
        self.bounds = Rect::bounding(
            member_positions
                .into_iter()
                .map(|p| (p, TASK_WIDTH, TASK_HEIGHT)),
        )
        .map(|r| r.inflate(GROUP_PADDING));
        self.bounds
    }

    /// Refresh badge text, status class and progress bar.
    pub fn update_status_badge(&self, doc: &mut Document, status: TaskStatus, progress: GroupProgress) {
        if let Some(el) = self.element {
            doc.remove_class_prefix(el, "status-");
            doc.add_class(el, &format!("status-{}", status.as_str()));
            if let Some(bounds) = self.bounds {
                doc.set_attr(
                    el,
                    "data-bounds",
                    format!("{} {} {} {}", bounds.x, bounds.y, bounds.width, bounds.height),
                );
            }
        }
        if let Some(badge) = self.badge_el {
            doc.set_text(
                badge,
                format!("{} · {}/{}", status_label(status), progress.completed, progress.total),
            );
        }
        if let Some(bar) = self.progress_el {
            doc.set_attr(bar, "aria-valuenow", progress.percentage.to_string());
            doc.set_style(bar, "--progress", format!("{}%", progress.percentage));
        }
    }
}
