// src/render/mod.rs

//! Node and group renderers.
//!
//! Each renderer creates its element once and afterwards only mutates it
//! (position, status, expansion). Neither knows about connections; the canvas
//! redraws edges after every geometry change.

pub mod group_node;
pub mod style;
pub mod task_node;

pub use group_node::GroupNode;
pub use task_node::TaskNode;
