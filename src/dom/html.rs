// src/dom/html.rs

//! Serialization of a [`Document`] subtree into HTML/SVG markup.

use std::fmt::Write;

use super::{Document, ElementId};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Serialize the children of the document root (the `<body>` contents).
pub fn body_to_html(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        write_element(doc, child, &mut out);
    }
    out
}

/// Serialize one element and its subtree.
pub fn element_to_html(doc: &Document, el: ElementId) -> String {
    let mut out = String::new();
    write_element(doc, el, &mut out);
    out
}

fn write_element(doc: &Document, el: ElementId, out: &mut String) {
    let element = doc.get(el);
    out.push('<');
    out.push_str(&element.tag);

    if let Some(id) = &element.id {
        let _ = write!(out, " id=\"{}\"", escape_xml(id));
    }
    if !element.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_xml(&element.classes.join(" ")));
    }
    for (name, value) in &element.attrs {
        let _ = write!(out, " {}=\"{}\"", name, escape_xml(value));
    }
    if !element.style.is_empty() {
        let style = element
            .style
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        let _ = write!(out, " style=\"{}\"", escape_xml(&style));
    }

    let empty = element.children.is_empty() && element.text.is_none();
    if element.svg && empty {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if !element.svg && VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    if let Some(text) = &element.text {
        out.push_str(&escape_xml(text));
    }
    for &child in &element.children {
        write_element(doc, child, out);
    }
    let _ = write!(out, "</{}>", element.tag);
}

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_attributes_and_escapes_text() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("div");
        doc.set_id(div, "main");
        doc.add_class(div, "a");
        doc.set_attr(div, "data-x", "1");
        doc.set_text(div, "R&D <team>");
        doc.append_child(root, div);

        let svg = doc.create_svg_element("path");
        doc.set_attr(svg, "d", "M 0 0 L 1 1");
        doc.append_child(div, svg);

        assert_eq!(
            body_to_html(&doc),
            "<div id=\"main\" class=\"a\" data-x=\"1\">R&amp;D &lt;team&gt;<path d=\"M 0 0 L 1 1\"/></div>"
        );
    }
}
