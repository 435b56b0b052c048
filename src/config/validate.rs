// src/config/validate.rs

use std::collections::HashSet;
use std::sync::LazyLock;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use regex::Regex;
use tracing::warn;

use crate::config::model::{PortfolioFile, RawPortfolioFile, TaskSpec};
use crate::errors::{DagfolioError, Result};

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("id pattern is a valid regex")
});

impl TryFrom<RawPortfolioFile> for PortfolioFile {
    type Error = DagfolioError;

    fn try_from(raw: RawPortfolioFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_portfolio(&raw)?;
        let portfolio = PortfolioFile::new_unchecked(raw);
        for warning in dependency_warnings(&portfolio.all_tasks()) {
            warn!("{warning}");
        }
        Ok(portfolio)
    }
}

fn validate_raw_portfolio(raw: &RawPortfolioFile) -> Result<()> {
    ensure_has_tasks(raw)?;
    validate_ids(raw)?;
    validate_group_members(raw)?;
    validate_canvas_settings(raw)?;
    validate_simulation_settings(raw)?;
    Ok(())
}

fn ensure_has_tasks(raw: &RawPortfolioFile) -> Result<()> {
    let inline = raw
        .task_groups
        .iter()
        .flat_map(|g| g.tasks.iter())
        .any(|m| matches!(m, crate::config::GroupMember::Inline(_)));
    if raw.tasks.is_empty() && !inline {
        return Err(DagfolioError::ConfigError(
            "portfolio must contain at least one [[tasks]] entry".to_string(),
        ));
    }
    Ok(())
}

/// Tasks (including inline group members) and groups share one namespace.
fn validate_ids(raw: &RawPortfolioFile) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    let inline = raw.task_groups.iter().flat_map(|g| {
        g.tasks.iter().filter_map(|m| match m {
            crate::config::GroupMember::Inline(spec) => Some(spec.id.as_str()),
            crate::config::GroupMember::Id(_) => None,
        })
    });
    let ids = raw
        .tasks
        .iter()
        .map(|t| t.id.as_str())
        .chain(inline)
        .chain(raw.task_groups.iter().map(|g| g.id.as_str()));

    for id in ids {
        if !ID_PATTERN.is_match(id) {
            return Err(DagfolioError::ConfigError(format!(
                "invalid id '{id}' (use letters, digits, '-' and '_')"
            )));
        }
        if !seen.insert(id) {
            return Err(DagfolioError::ConfigError(format!("duplicate id '{id}'")));
        }
    }
    Ok(())
}

fn validate_group_members(raw: &RawPortfolioFile) -> Result<()> {
    let task_ids: HashSet<&str> = raw.tasks.iter().map(|t| t.id.as_str()).collect();
    for group in &raw.task_groups {
        for member in &group.tasks {
            if let crate::config::GroupMember::Id(id) = member {
                if !task_ids.contains(id.as_str()) {
                    return Err(DagfolioError::ConfigError(format!(
                        "group '{}' references unknown task '{}'",
                        group.id, id
                    )));
                }
            }
        }
    }
    Ok(())
}

fn validate_canvas_settings(raw: &RawPortfolioFile) -> Result<()> {
    let c = &raw.canvas;
    for (key, value) in [
        ("min_scale", c.min_scale),
        ("max_scale", c.max_scale),
        ("zoom_step", c.zoom_step),
        ("width", c.width),
        ("height", c.height),
    ] {
        if !value.is_finite() {
            return Err(DagfolioError::ConfigError(format!(
                "[canvas].{key} must be a finite number (got {value})"
            )));
        }
    }
    if !(c.min_scale > 0.0) {
        return Err(DagfolioError::ConfigError(format!(
            "[canvas].min_scale must be > 0 (got {})",
            c.min_scale
        )));
    }
    if c.min_scale > c.max_scale {
        return Err(DagfolioError::ConfigError(format!(
            "[canvas].min_scale ({}) must not exceed max_scale ({})",
            c.min_scale, c.max_scale
        )));
    }
    if !(c.zoom_step > 1.0) {
        return Err(DagfolioError::ConfigError(format!(
            "[canvas].zoom_step must be > 1 (got {})",
            c.zoom_step
        )));
    }
    if c.max_redraw_attempts == 0 {
        return Err(DagfolioError::ConfigError(
            "[canvas].max_redraw_attempts must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_simulation_settings(raw: &RawPortfolioFile) -> Result<()> {
    let s = &raw.simulation;
    if !(0.0..=1.0).contains(&s.failure_rate) {
        return Err(DagfolioError::ConfigError(format!(
            "[simulation].failure_rate must be within [0, 1] (got {})",
            s.failure_rate
        )));
    }
    if s.min_delay_ms > s.max_delay_ms {
        return Err(DagfolioError::ConfigError(format!(
            "[simulation].min_delay_ms ({}) must not exceed max_delay_ms ({})",
            s.min_delay_ms, s.max_delay_ms
        )));
    }
    Ok(())
}

/// Non-fatal dependency problems: dangling ids, self-dependencies and cycles.
///
/// None of these stop the page from rendering. Dangling edges are skipped by
/// the canvas and cycles are cut by the leveling/ordering algorithms.
pub fn dependency_warnings(tasks: &[TaskSpec]) -> Vec<String> {
    let mut warnings = Vec::new();
    let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    // Edge direction: dep -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for task in tasks {
        graph.add_node(task.id.as_str());
    }

    for task in tasks {
        for dep in &task.dependencies {
            if dep == &task.id {
                warnings.push(format!("task '{}' depends on itself", task.id));
            } else if !ids.contains(dep.as_str()) {
                warnings.push(format!(
                    "task '{}' has unknown dependency '{}'; edge will be skipped",
                    task.id, dep
                ));
            } else {
                graph.add_edge(dep.as_str(), task.id.as_str(), ());
            }
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        warnings.push(format!(
            "dependency cycle involving task '{}'; levels will be cut at the cycle",
            cycle.node_id()
        ));
    }

    warnings
}
