// src/render/task_node.rs

//! Task card renderer.

use tracing::{debug, warn};

use crate::dom::{px, Document, ElementId};
use crate::model::Task;
use crate::render::style::{category_icon, css_token, status_label, TASK_HEIGHT, TASK_WIDTH};
use crate::types::TaskStatus;

/// Action buttons rendered on every task card, as `data-action` values.
pub const TASK_ACTIONS: [(&str, &str); 3] =
    [("details", "View details"), ("logs", "View logs"), ("run", "Run")];

/// A task plus the elements that display it.
///
/// The card is created once by [`TaskNode::render`]; afterwards only
/// [`TaskNode::update_position`] / [`TaskNode::update_status`] touch it.
#[derive(Debug, Clone)]
pub struct TaskNode {
    pub task: Task,
    element: Option<ElementId>,
    status_el: Option<ElementId>,
    details_el: Option<ElementId>,
    details_open: bool,
}

impl TaskNode {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            element: None,
            status_el: None,
            details_el: None,
            details_open: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn details_open(&self) -> bool {
        self.details_open
    }

    /// DOM id of the card.
    pub fn dom_id(id: &str) -> String {
        format!("task-{id}")
    }

    /// Build the card at `(x, y)` and return it.
    ///
    /// The element is not attached anywhere; the canvas appends it to the
    /// node layer. A second call returns the existing element unchanged.
    pub fn render(&mut self, doc: &mut Document, x: f64, y: f64) -> ElementId {
        if let Some(el) = self.element {
            debug!(task = %self.task.id, "task node already rendered; reusing element");
            return el;
        }

        let task = &self.task;
        let card = doc.create_element("div");
        doc.set_id(card, &Self::dom_id(&task.id));
        doc.add_class(card, "task-node");
        doc.add_class(card, &format!("task-{}", task.category.as_str()));
        doc.add_class(card, &format!("status-{}", task.status.as_str()));
        doc.set_attr(card, "data-node-id", task.id.clone());
        doc.set_attr(card, "role", "group");
        doc.set_attr(card, "tabindex", "0");
        doc.set_attr(card, "aria-label", format!("{} ({})", task.title, task.status));
        doc.set_style(card, "position", "absolute");
        doc.set_style(card, "width", px(TASK_WIDTH));
        doc.set_style(card, "min-height", px(TASK_HEIGHT));

        let header = doc.create_element("div");
        doc.add_class(header, "task-header");
        let icon = doc.create_element("span");
        doc.add_class(icon, "task-icon");
        doc.set_attr(icon, "aria-hidden", "true");
        doc.set_text(icon, category_icon(task.category));
        let title = doc.create_element("span");
        doc.add_class(title, "task-title");
        doc.set_text(title, task.title.clone());
        let status = doc.create_element("span");
        doc.add_class(status, "task-status");
        doc.set_text(status, status_label(task.status));
        doc.append_child(header, icon);
        doc.append_child(header, title);
        doc.append_child(header, status);
        doc.append_child(card, header);

        let details = doc.create_element("div");
        doc.add_class(details, "task-details");
        doc.set_style(details, "display", "none");
        if !task.description.is_empty() {
            let p = doc.create_element("p");
            doc.set_text(p, task.description.clone());
            doc.append_child(details, p);
        }
        if !task.details.is_empty() {
            let ul = doc.create_element("ul");
            for line in &task.details {
                let li = doc.create_element("li");
                doc.set_text(li, line.clone());
                doc.append_child(ul, li);
            }
            doc.append_child(details, ul);
        }
        doc.append_child(card, details);

        let actions = doc.create_element("div");
        doc.add_class(actions, "task-actions");
        for (action, label) in TASK_ACTIONS {
            let button = doc.create_element("button");
            doc.set_attr(button, "type", "button");
            doc.set_attr(button, "data-action", action);
            doc.set_attr(button, "data-node-id", task.id.clone());
            doc.set_text(button, label);
            doc.append_child(actions, button);
        }
        doc.append_child(card, actions);

        self.element = Some(card);
        self.status_el = Some(status);
        self.details_el = Some(details);
        self.update_position(doc, x, y);
        card
    }

    /// Move the card without re-creating it.
    ///
    /// Callers redraw connections afterwards.
    pub fn update_position(&mut self, doc: &mut Document, x: f64, y: f64) {
        self.task.position.x = x;
        self.task.position.y = y;
        if let Some(el) = self.element {
            doc.set_style(el, "left", px(x));
            doc.set_style(el, "top", px(y));
        }
    }

    /// Apply a status given as a string.
    ///
    /// Known statuses update the task and the card. Anything else is applied
    /// as a `status-<raw>` class only and displayed as pending; the task's
    /// own status is left untouched. Returns the parsed status, if any.
    pub fn update_status(&mut self, doc: &mut Document, raw: &str) -> Option<TaskStatus> {
        match raw.parse::<TaskStatus>() {
            Ok(status) => {
                self.set_status(doc, status);
                Some(status)
            }
            Err(_) => {
                warn!(task = %self.task.id, status = %raw, "unrecognized status; rendering as pending");
                if let Some(el) = self.element {
                    doc.remove_class_prefix(el, "status-");
                    doc.add_class(el, &format!("status-{}", css_token(raw)));
                }
                if let Some(status_el) = self.status_el {
                    doc.set_text(status_el, status_label(TaskStatus::Pending));
                }
                None
            }
        }
    }

    pub fn set_status(&mut self, doc: &mut Document, status: TaskStatus) {
        self.task.status = status;
        if let Some(el) = self.element {
            doc.remove_class_prefix(el, "status-");
            doc.add_class(el, &format!("status-{}", status.as_str()));
            doc.set_attr(el, "aria-label", format!("{} ({})", self.task.title, status));
        }
        if let Some(status_el) = self.status_el {
            doc.set_text(status_el, status_label(status));
        }
    }

    /// Show or hide the detail panel. Returns the new state.
    pub fn toggle_details(&mut self, doc: &mut Document) -> bool {
        self.details_open = !self.details_open;
        if let Some(details) = self.details_el {
            doc.set_style(details, "display", if self.details_open { "block" } else { "none" });
        }
        if let Some(el) = self.element {
            doc.toggle_class(el, "expanded", self.details_open);
        }
        self.details_open
    }
}
