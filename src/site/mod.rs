// src/site/mod.rs

//! Page bootstrap: document skeleton, toolbar, resume sections and the
//! final HTML.

pub mod page;
pub mod sections;
pub mod theme;
pub mod toolbar;

pub use page::Page;
pub use toolbar::ToolbarAction;

/// Id of the element the canvas mounts on.
pub const CANVAS_ID: &str = "dag-canvas";

/// Id of the `aria-live` status region.
pub const LIVE_REGION_ID: &str = "dag-announcements";
