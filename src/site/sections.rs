// src/site/sections.rs

//! Static resume sections rendered below the canvas.

use crate::config::model::{PortfolioFile, Profile};
use crate::dom::{Document, ElementId};

/// `<header>` with name, headline and contact links.
pub fn render_header(doc: &mut Document, parent: ElementId, profile: &Profile) -> ElementId {
    let header = doc.create_element("header");
    doc.add_class(header, "page-header");

    let h1 = doc.create_element("h1");
    doc.set_text(
        h1,
        if profile.name.is_empty() {
            "Resume".to_string()
        } else {
            profile.name.clone()
        },
    );
    doc.append_child(header, h1);

    if !profile.headline.is_empty() {
        let p = doc.create_element("p");
        doc.add_class(p, "headline");
        doc.set_text(p, profile.headline.clone());
        doc.append_child(header, p);
    }

    let mut contact: Vec<(String, Option<String>)> = Vec::new();
    if let Some(email) = &profile.email {
        contact.push((email.clone(), Some(format!("mailto:{email}"))));
    }
    if let Some(location) = &profile.location {
        contact.push((location.clone(), None));
    }
    contact.extend(
        profile
            .links
            .iter()
            .map(|l| (l.label.clone(), Some(l.url.clone()))),
    );

    if !contact.is_empty() {
        let ul = doc.create_element("ul");
        doc.add_class(ul, "contact");
        for (label, href) in contact {
            let li = doc.create_element("li");
            match href {
                Some(href) => {
                    let a = doc.create_element("a");
                    doc.set_attr(a, "href", href);
                    doc.set_text(a, label);
                    doc.append_child(li, a);
                }
                None => doc.set_text(li, label),
            }
            doc.append_child(ul, li);
        }
        doc.append_child(header, ul);
    }

    doc.append_child(parent, header);
    header
}

fn section(doc: &mut Document, parent: ElementId, id: &str, title: &str) -> ElementId {
    let s = doc.create_element("section");
    doc.set_id(s, id);
    doc.add_class(s, "resume-section");
    doc.set_attr(s, "aria-labelledby", format!("{id}-title"));
    let h2 = doc.create_element("h2");
    doc.set_id(h2, &format!("{id}-title"));
    doc.set_text(h2, title);
    doc.append_child(s, h2);
    doc.append_child(parent, s);
    s
}

fn item(doc: &mut Document, parent: ElementId, heading: String, meta: &str) -> ElementId {
    let article = doc.create_element("article");
    let h3 = doc.create_element("h3");
    doc.set_text(h3, heading);
    doc.append_child(article, h3);
    if !meta.is_empty() {
        let p = doc.create_element("p");
        doc.add_class(p, "meta");
        doc.set_text(p, meta);
        doc.append_child(article, p);
    }
    doc.append_child(parent, article);
    article
}

fn bullets(doc: &mut Document, parent: ElementId, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let ul = doc.create_element("ul");
    for line in lines {
        let li = doc.create_element("li");
        doc.set_text(li, line.clone());
        doc.append_child(ul, li);
    }
    doc.append_child(parent, ul);
}

/// Experience, education, skills and projects; empty sections are omitted.
/// Returns how many sections were rendered.
pub fn render_sections(doc: &mut Document, parent: ElementId, data: &PortfolioFile) -> usize {
    let mut rendered = 0;

    if !data.experience.is_empty() {
        let s = section(doc, parent, "experience", "Experience");
        for e in &data.experience {
            let article = item(doc, s, format!("{} · {}", e.role, e.company), &e.period);
            bullets(doc, article, &e.achievements);
        }
        rendered += 1;
    }

    if !data.education.is_empty() {
        let s = section(doc, parent, "education", "Education");
        for e in &data.education {
            item(doc, s, format!("{} · {}", e.degree, e.institution), &e.period);
        }
        rendered += 1;
    }

    if !data.skills.is_empty() {
        let s = section(doc, parent, "skills", "Skills");
        for set in &data.skills {
            let article = item(doc, s, set.area.clone(), "");
            bullets(doc, article, &set.items);
        }
        rendered += 1;
    }

    if !data.projects.is_empty() {
        let s = section(doc, parent, "projects", "Projects");
        for p in &data.projects {
            let article = item(doc, s, p.name.clone(), &p.summary);
            if let Some(url) = &p.url {
                let a = doc.create_element("a");
                doc.set_attr(a, "href", url.clone());
                doc.set_text(a, url.clone());
                doc.append_child(article, a);
            }
        }
        rendered += 1;
    }

    rendered
}
