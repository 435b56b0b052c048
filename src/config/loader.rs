// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{PortfolioFile, RawPortfolioFile};
use crate::errors::Result;

/// On-disk format of a portfolio data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Toml,
    Json,
}

impl DataFormat {
    /// `.json` files are read as JSON, everything else as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DataFormat::Json,
            _ => DataFormat::Toml,
        }
    }
}

/// Deserialize data without semantic validation.
pub fn parse_str(contents: &str, format: DataFormat) -> Result<RawPortfolioFile> {
    let raw = match format {
        DataFormat::Toml => toml::from_str(contents)?,
        DataFormat::Json => serde_json::from_str(contents)?,
    };
    Ok(raw)
}

/// Load a data file from a given path and return the raw `RawPortfolioFile`.
///
/// This only performs deserialization; it does **not** check ids or
/// settings. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPortfolioFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let format = DataFormat::from_path(path);
    debug!(path = %path.display(), ?format, "reading portfolio data");
    parse_str(&contents, format)
}

/// Load a data file and validate it.
///
/// Dangling dependencies and cycles are reported as warnings only; the
/// canvas skips dangling edges and the leveling algorithm tolerates cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PortfolioFile> {
    let raw = load_from_path(&path)?;
    let portfolio = PortfolioFile::try_from(raw)?;
    Ok(portfolio)
}

