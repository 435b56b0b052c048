// src/canvas/mod.rs

//! The DAG canvas and its layout engine.
//!
//! [`WorkflowCanvas`] owns everything one page instance shows: the node
//! index, the connection list, the viewport and the two layers it draws
//! into. The submodules split it by concern:
//!
//! - [`workflow`] registration, statuses, groups, the details dialog and the
//!   frame loop.
//! - [`edges`] SVG path drawing and the layout-readiness retry.
//! - [`interaction`] transform sync, zoom, drag/pan, auto layout and fitting.
//! - [`geometry`], [`layout`], [`viewport`] are the pure math behind them.
//! - [`frames`] is the virtual-time replacement for animation frames and
//!   short timers.

pub mod edges;
pub mod frames;
pub mod geometry;
pub mod index;
pub mod interaction;
pub mod layout;
pub mod viewport;
pub mod workflow;

use std::time::Duration;

pub use edges::RedrawOutcome;
pub use frames::{FrameScheduler, FrameTask, FRAME};
pub use geometry::{route, EdgePath, PathStyle};
pub use index::{NodeEntry, NodeIndex};
pub use interaction::DragMode;
pub use layout::LayoutPlan;
pub use viewport::Viewport;
pub use workflow::WorkflowCanvas;

/// Delay between a transform change and the connection redraw it triggers.
pub const TRANSFORM_REDRAW_DELAY: Duration = Duration::from_millis(50);
