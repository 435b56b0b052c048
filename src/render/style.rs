// src/render/style.rs

//! Nominal node geometry, category icons and status colours.

use crate::types::{Category, TaskStatus};

/// Nominal task card size used for edge anchors, layout and fitting.
pub const TASK_WIDTH: f64 = 200.0;
pub const TASK_HEIGHT: f64 = 80.0;

pub const GROUP_WIDTH: f64 = 280.0;
pub const GROUP_HEADER_HEIGHT: f64 = 64.0;
pub const GROUP_ROW_HEIGHT: f64 = 28.0;
/// Padding added around member boxes when deriving a group's bounds.
pub const GROUP_PADDING: f64 = 20.0;

pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Education => "🎓",
        Category::Experience => "💼",
        Category::Skills => "🛠",
        Category::Projects => "🚀",
        Category::Certifications => "📜",
        Category::Generic => "📄",
    }
}

/// Stroke/marker colour of an edge, keyed by its source status.
pub fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "#9ca3af",
        TaskStatus::Running => "#3b82f6",
        TaskStatus::Success => "#10b981",
        TaskStatus::Failed => "#ef4444",
    }
}

/// Human-readable status text shown in a node header.
pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Pending",
        TaskStatus::Running => "Running",
        TaskStatus::Success => "Success",
        TaskStatus::Failed => "Failed",
    }
}

/// Reduce a raw status string to something safe to use in a class name.
pub fn css_token(raw: &str) -> String {
    let token: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    if token.is_empty() {
        "unknown".to_string()
    } else {
        token
    }
}
