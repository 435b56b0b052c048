// src/services/a11y.rs

//! Accessibility helpers: an ARIA live region buffer and a modal focus trap.

use crate::dom::{Document, ElementId};

/// How urgently a message should interrupt the screen reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_str(self) -> &'static str {
        match self {
            Politeness::Polite => "polite",
            Politeness::Assertive => "assertive",
        }
    }
}

/// Bounded buffer of announcements, rendered into an `aria-live` element.
#[derive(Debug, Clone)]
pub struct LiveRegion {
    messages: Vec<String>,
    politeness: Politeness,
    capacity: usize,
}

impl Default for LiveRegion {
    fn default() -> Self {
        Self::with_capacity(50)
    }
}

impl LiveRegion {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Vec::new(),
            politeness: Politeness::Polite,
            capacity: capacity.max(1),
        }
    }

    /// Record a message. Consecutive duplicates are dropped; the oldest
    /// message is evicted once the buffer is full.
    pub fn push(&mut self, message: &str, politeness: Politeness) {
        if self.messages.last().map(String::as_str) == Some(message) {
            return;
        }
        if self.messages.len() == self.capacity {
            self.messages.remove(0);
        }
        self.messages.push(message.to_string());
        if politeness == Politeness::Assertive {
            self.politeness = Politeness::Assertive;
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Create the region element (visually hidden, announced by AT).
    pub fn mount(doc: &mut Document, parent: ElementId, dom_id: &str) -> ElementId {
        let el = doc.create_element("div");
        doc.set_id(el, dom_id);
        doc.add_class(el, "sr-only");
        doc.set_attr(el, "role", "status");
        doc.set_attr(el, "aria-live", Politeness::Polite.as_str());
        doc.set_attr(el, "aria-atomic", "true");
        doc.append_child(parent, el);
        el
    }

    /// Write the most recent message into `el`.
    pub fn render_into(&self, doc: &mut Document, el: ElementId) {
        doc.set_attr(el, "aria-live", self.politeness.as_str());
        doc.set_text(el, self.messages.last().cloned().unwrap_or_default());
    }
}

/// Cyclic focus order inside a modal dialog.
///
/// Tab from the last focusable element wraps to the first and Shift+Tab from
/// the first wraps to the last.
#[derive(Debug, Clone)]
pub struct FocusTrap {
    order: Vec<ElementId>,
    current: usize,
}

impl FocusTrap {
    /// Trap focus among `order`; `None` when there is nothing focusable.
    pub fn new(order: Vec<ElementId>) -> Option<Self> {
        if order.is_empty() {
            return None;
        }
        Some(Self { order, current: 0 })
    }

    /// Focusable descendants of `scope`: buttons, links and explicit
    /// `tabindex` >= 0, in document order.
    pub fn focusables(doc: &Document, scope: ElementId) -> Vec<ElementId> {
        doc.query_all(scope, |el| {
            let tabbable = el
                .attrs
                .get("tabindex")
                .and_then(|t| t.parse::<i32>().ok())
                .map(|t| t >= 0);
            match tabbable {
                Some(t) => t,
                None => matches!(el.tag.as_str(), "button" | "a" | "input" | "select" | "textarea"),
            }
        })
    }

    pub fn focused(&self) -> ElementId {
        self.order[self.current]
    }

    pub fn focus_next(&mut self) -> ElementId {
        self.current = (self.current + 1) % self.order.len();
        self.focused()
    }

    pub fn focus_prev(&mut self) -> ElementId {
        self.current = (self.current + self.order.len() - 1) % self.order.len();
        self.focused()
    }
}
