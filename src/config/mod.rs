// src/config/mod.rs

//! Portfolio data loading and validation.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a data file from disk, TOML or JSON (`loader.rs`).
//! - Validate ids and settings, and warn about dangling or cyclic
//!   dependencies (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str, DataFormat};
pub use model::{
    CanvasSettings, GroupMember, GroupSpec, PortfolioFile, Profile, RawPortfolioFile,
    SimulationSettings, TaskSpec,
};
pub use validate::dependency_warnings;
