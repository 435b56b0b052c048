// src/site/theme.rs

//! Inline stylesheet for the generated page.

use std::fmt::Write;

use crate::render::style::status_color;
use crate::types::TaskStatus;

const BASE_CSS: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; color: #111827; background: #f9fafb; }
.page-header { padding: 24px 32px; }
.page-header .contact { display: flex; gap: 16px; list-style: none; padding: 0; }
.toolbar { display: flex; gap: 8px; padding: 8px 32px; }
.toolbar button { padding: 6px 12px; border: 1px solid #d1d5db; border-radius: 6px; background: #fff; }
.workflow-canvas { margin: 0 32px; border: 1px solid #e5e7eb; border-radius: 8px; background: #fff; }
.task-node { box-sizing: border-box; padding: 8px; border: 2px solid #9ca3af; border-radius: 8px; background: #fff; cursor: grab; }
.task-header { display: flex; gap: 6px; align-items: center; font-weight: 600; }
.task-status { margin-left: auto; font-size: 12px; font-weight: 400; }
.task-actions { display: flex; gap: 4px; margin-top: 6px; }
.task-group { box-sizing: border-box; border: 2px dashed #9ca3af; border-radius: 10px; background: rgba(243, 244, 246, 0.6); overflow: hidden; }
.task-group.transitioning { transition: height 300ms ease; }
.group-progress { height: 4px; background: linear-gradient(90deg, #10b981 var(--progress, 0%), #e5e7eb 0); }
.connection.animated { stroke-dasharray: 6 4; animation: dash 1s linear infinite; }
.connection-label { font-size: 11px; fill: #4b5563; }
.details-modal { position: absolute; top: 10%; left: 50%; transform: translateX(-50%); padding: 16px 24px; background: #fff; border-radius: 8px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.2); }
.sr-only { position: absolute; width: 1px; height: 1px; overflow: hidden; clip: rect(0 0 0 0); }
.resume-section { padding: 16px 32px; }
@keyframes dash { to { stroke-dashoffset: -20; } }
"#;

/// Base rules plus one border colour rule per status.
pub fn stylesheet() -> String {
    let mut css = BASE_CSS.trim_start().to_string();
    for status in TaskStatus::ALL {
        let _ = writeln!(
            css,
            ".status-{0} {{ border-color: {1}; }}\n.status-{0} .task-status {{ color: {1}; }}",
            status.as_str(),
            status_color(status)
        );
    }
    css
}
