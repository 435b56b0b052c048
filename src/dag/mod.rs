// src/dag/mod.rs

//! Dependency graph of the portfolio tasks.
//!
//! - [`graph`] holds adjacency lists (dependencies and dependents).
//! - [`levels`] assigns each task its column (longest dependency chain).
//! - [`order`] produces the cosmetic execution order for the simulator.
//!
//! Nothing here assumes the graph is acyclic: cycles are cut where they are
//! first revisited.

pub mod graph;
pub mod levels;
pub mod order;

pub use graph::DagGraph;
pub use levels::compute_levels;
pub use order::execution_order;
