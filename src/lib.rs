// src/lib.rs

pub mod canvas;
pub mod cli;
pub mod config;
pub mod dag;
pub mod dom;
pub mod engine;
pub mod errors;
pub mod events;
pub mod fs;
pub mod logging;
pub mod model;
pub mod render;
pub mod services;
pub mod site;
pub mod storage;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::PortfolioFile;
use crate::config::validate::dependency_warnings;
use crate::dag::levels::compute_levels;
use crate::dag::{execution_order, DagGraph};
use crate::fs::RealFileSystem;
use crate::services::PageServices;
use crate::site::Page;
use crate::storage::SnapshotStore;

/// Upper bound of virtual time spent letting frames and transitions settle
/// before the page is serialized.
const SETTLE_LIMIT: Duration = Duration::from_secs(2);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - data loading and validation
/// - page bootstrap (document, canvas, services)
/// - layout, snapshot restore and fitting
/// - (optional) the execution animation
/// - HTML output and snapshot save
pub async fn run(args: CliArgs) -> Result<()> {
    let data_path = PathBuf::from(&args.data);
    let mut data = load_and_validate(&data_path)?;
    if let Some(seed) = args.seed {
        data.simulation.seed = Some(seed);
    }

    if args.dry_run {
        print_dry_run(&data);
        return Ok(());
    }

    let services = Arc::new(PageServices::default());
    let mut page = Page::build(&data, services)?;

    if !args.keep_positions {
        page.canvas_mut().auto_layout_tasks();
    }
    page.canvas_mut().fit_to_screen();

    let store = args
        .snapshot_dir
        .as_ref()
        .map(|dir| SnapshotStore::new(RealFileSystem, dir));
    if args.restore {
        if let Some(store) = &store {
            store.restore(page.canvas_mut());
        }
    }
    page.settle(SETTLE_LIMIT);

    if args.simulate {
        let (settled, summary) = page.simulate_with_settings(&data.simulation).await?;
        page = settled;
        page.settle(SETTLE_LIMIT);
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "simulation complete"
        );
    }

    let out = Path::new(&args.out);
    page.write_to(&RealFileSystem, out)?;

    if let Some(store) = &store {
        store.save(page.canvas());
    }

    let stats = page.services().frame_stats();
    debug!(
        frames = stats.frames,
        slow = stats.slow_frames,
        "frame statistics"
    );
    Ok(())
}

/// Simple dry-run output: tasks with their level and dependencies, groups,
/// warnings and the simulated execution order.
fn print_dry_run(data: &PortfolioFile) {
    let tasks = data.all_tasks();
    let graph = DagGraph::from_specs(&tasks);
    let levels = compute_levels(&graph);

    println!("dagfolio dry-run");
    println!(
        "  canvas: {}x{}, scale [{}, {}]",
        data.canvas.width, data.canvas.height, data.canvas.min_scale, data.canvas.max_scale
    );
    println!();

    println!("tasks ({}):", tasks.len());
    for task in &tasks {
        let level = levels.get(&task.id).copied().unwrap_or(0);
        println!("  - {} [level {level}] {}", task.id, task.title);
        if !task.dependencies.is_empty() {
            println!("      after: {:?}", task.dependencies);
        }
        if let Some(group) = &task.group {
            println!("      group: {group}");
        }
    }

    if !data.task_groups.is_empty() {
        println!();
        println!("groups ({}):", data.task_groups.len());
        for group in &data.task_groups {
            println!("  - {} {:?}", group.id, group.member_ids());
        }
    }

    let warnings = dependency_warnings(&tasks);
    if !warnings.is_empty() {
        println!();
        println!("warnings:");
        for w in warnings {
            println!("  - {w}");
        }
    }

    println!();
    println!("execution order: {}", execution_order(&graph).join(" -> "));
    debug!("dry-run complete (nothing written)");
}
