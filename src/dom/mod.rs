// src/dom/mod.rs

//! Headless element tree standing in for the browser DOM.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`ElementId`]. Removed elements stay in the arena but are detached from
//! their parent, so ids never dangle.
//!
//! Layout is modelled explicitly: [`Document::offset_width`] reports `0.0`
//! until [`Document::layout`] has run, the same way a freshly inserted
//! browser element measures zero before the next layout pass.

pub mod html;

use std::collections::BTreeMap;

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
    /// SVG elements serialize without HTML void-element rules.
    pub svg: bool,
    laid_out: bool,
}

impl Element {
    fn new(tag: &str, svg: bool) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            style: BTreeMap::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            svg,
            laid_out: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// New document with an empty `<body>` root.
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body", false)],
            root: ElementId(0),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.push(Element::new(tag, false))
    }

    pub fn create_svg_element(&mut self, tag: &str) -> ElementId {
        self.push(Element::new(tag, true))
    }

    fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(child);
    }

    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) {
        if self.get(child).parent == Some(parent) {
            self.detach(child);
        }
    }

    fn detach(&mut self, child: ElementId) {
        if let Some(old) = self.get_mut(child).parent.take() {
            self.get_mut(old).children.retain(|c| *c != child);
        }
    }

    /// Remove every child of `parent` for which `keep` returns false.
    pub fn retain_children(&mut self, parent: ElementId, mut keep: impl FnMut(&Element) -> bool) {
        let children = self.get(parent).children.clone();
        for child in children {
            if !keep(self.get(child)) {
                self.detach(child);
            }
        }
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.get(id).children
    }

    /// True if `id` is reachable from the document root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(el) = current {
            if el == self.root {
                return true;
            }
            current = self.get(el).parent;
        }
        false
    }

    /// Depth-first search for a connected element with the given id.
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        let mut stack = vec![self.root];
        while let Some(el) = stack.pop() {
            if self.get(el).id.as_deref() == Some(id) {
                return Some(el);
            }
            stack.extend(self.get(el).children.iter().rev().copied());
        }
        None
    }

    /// Connected descendants of `scope` (inclusive) matching `pred`, in
    /// document order.
    pub fn query_all(&self, scope: ElementId, pred: impl Fn(&Element) -> bool) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack = vec![scope];
        while let Some(el) = stack.pop() {
            if pred(self.get(el)) {
                found.push(el);
            }
            stack.extend(self.get(el).children.iter().rev().copied());
        }
        found
    }

    pub fn set_id(&mut self, el: ElementId, id: &str) {
        self.get_mut(el).id = Some(id.to_string());
    }

    pub fn set_attr(&mut self, el: ElementId, name: &str, value: impl Into<String>) {
        self.get_mut(el).attrs.insert(name.to_string(), value.into());
    }

    pub fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.get(el).attrs.get(name).map(String::as_str)
    }

    pub fn remove_attr(&mut self, el: ElementId, name: &str) {
        self.get_mut(el).attrs.remove(name);
    }

    /// Set an inline style property. Changing geometry invalidates layout for
    /// that element.
    pub fn set_style(&mut self, el: ElementId, prop: &str, value: impl Into<String>) {
        let value = value.into();
        let element = self.get_mut(el);
        if matches!(prop, "width" | "height" | "display")
            && element.style.get(prop) != Some(&value)
        {
            element.laid_out = false;
        }
        element.style.insert(prop.to_string(), value);
    }

    pub fn style(&self, el: ElementId, prop: &str) -> Option<&str> {
        self.get(el).style.get(prop).map(String::as_str)
    }

    pub fn add_class(&mut self, el: ElementId, class: &str) {
        let classes = &mut self.get_mut(el).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, el: ElementId, class: &str) {
        self.get_mut(el).classes.retain(|c| c != class);
    }

    /// Remove every class starting with `prefix`.
    pub fn remove_class_prefix(&mut self, el: ElementId, prefix: &str) {
        self.get_mut(el).classes.retain(|c| !c.starts_with(prefix));
    }

    pub fn toggle_class(&mut self, el: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(el, class);
        } else {
            self.remove_class(el, class);
        }
    }

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.get(el).classes.iter().any(|c| c == class)
    }

    pub fn set_text(&mut self, el: ElementId, text: impl Into<String>) {
        self.get_mut(el).text = Some(text.into());
    }

    pub fn text(&self, el: ElementId) -> Option<&str> {
        self.get(el).text.as_deref()
    }

    /// Run a layout pass over every connected element.
    pub fn layout(&mut self) {
        let connected = self.query_all(self.root, |_| true);
        for el in connected {
            self.get_mut(el).laid_out = true;
        }
    }

    /// Measured width in px; `0.0` before layout, when detached, or when
    /// hidden with `display: none`.
    pub fn offset_width(&self, el: ElementId) -> f64 {
        self.measure(el, "width")
    }

    pub fn offset_height(&self, el: ElementId) -> f64 {
        self.measure(el, "height")
    }

    fn measure(&self, el: ElementId, prop: &str) -> f64 {
        let element = self.get(el);
        if !element.laid_out || !self.is_connected(el) || self.style(el, "display") == Some("none") {
            return 0.0;
        }
        element
            .style
            .get(prop)
            .and_then(|v| parse_px(v))
            .unwrap_or(0.0)
    }
}

/// Parse `"120px"` / `"120"` into `120.0`.
pub fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

/// Format a coordinate the way it ends up in style/attribute strings.
pub fn px(value: f64) -> String {
    format!("{}px", fmt_num(value))
}

/// Compact number formatting: at most two decimals, no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_zero_until_layout() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_style(div, "width", "200px");
        let root = doc.root();
        doc.append_child(root, div);

        assert_eq!(doc.offset_width(div), 0.0);
        doc.layout();
        assert_eq!(doc.offset_width(div), 200.0);

        doc.set_style(div, "width", "240px");
        assert_eq!(doc.offset_width(div), 0.0);
    }

    #[test]
    fn append_moves_between_parents() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(a, child);
        doc.append_child(b, child);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.333333), "0.33");
        assert_eq!(fmt_num(-12.5), "-12.5");
        assert_eq!(px(50.0), "50px");
    }
}
