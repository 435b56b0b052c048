// tests/page_bootstrap.rs

mod common;
use crate::common::builders::{resume_chain, PortfolioBuilder, TaskSpecBuilder};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tempfile::TempDir;

use dagfolio::cli::CliArgs;
use dagfolio::config::model::ExperienceEntry;
use dagfolio::config::PortfolioFile;
use dagfolio::errors::DagfolioError;
use dagfolio::fs::MockFileSystem;
use dagfolio::run;
use dagfolio::services::PageServices;
use dagfolio::site::{Page, CANVAS_ID, LIVE_REGION_ID};

type TestResult = Result<(), Box<dyn Error>>;

fn page() -> Result<Page, Box<dyn Error>> {
    Ok(Page::build(&resume_chain(), Arc::new(PageServices::default()))?)
}

#[test]
fn page_mounts_toolbar_canvas_and_live_region() -> TestResult {
    init_tracing();
    let mut page = page()?;

    let doc = page.canvas().document();
    let buttons = doc.query_all(doc.root(), |el| el.attrs.contains_key("data-toolbar-action"));
    let actions: Vec<&str> = buttons
        .iter()
        .filter_map(|b| doc.attr(*b, "data-toolbar-action"))
        .collect();
    assert_eq!(
        actions,
        vec![
            "run",
            "pause",
            "stop",
            "zoom-in",
            "zoom-out",
            "fit",
            "center",
            "toggle-groups",
            "refresh"
        ]
    );

    let region = doc.get_element_by_id(LIVE_REGION_ID).ok_or("live region missing")?;
    assert_eq!(doc.attr(region, "aria-live"), Some("polite"));
    assert_eq!(doc.get_element_by_id(CANVAS_ID), Some(page.canvas().container()));

    // edu -> skills is implied by edu -> exp -> skills and gets no edge.
    assert_eq!(page.canvas().connections().len(), 3);
    page.settle(Duration::from_secs(1));
    assert_eq!(page.canvas().drawn_paths().len(), 3);
    Ok(())
}

#[test]
fn toolbar_actions_dispatch_by_name() -> TestResult {
    let mut page = page()?;

    assert!(page.dispatch_str("zoom-in")?);
    assert!((page.canvas().viewport().scale() - 1.2).abs() < 1e-9);
    assert!(page.dispatch_str("ZOOM_OUT")?);
    assert!((page.canvas().viewport().scale() - 1.0).abs() < 1e-9);
    assert!(page.dispatch_str("refresh")?);

    assert!(matches!(
        page.dispatch_str("launch"),
        Err(DagfolioError::UnknownAction(name)) if name == "launch"
    ));
    Ok(())
}

#[test]
fn html_output_carries_title_styles_and_canvas() -> TestResult {
    let mut page = page()?;
    page.settle(Duration::from_secs(1));
    let html = page.render_html();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Ada Example · Resume DAG</title>"));
    assert!(html.contains("<style>"));
    assert!(html.contains(&format!("id=\"{CANVAS_ID}\"")));
    assert!(html.contains("data-toolbar-action=\"toggle-groups\""));
    assert!(html.contains("id=\"task-edu\""));

    let fs = MockFileSystem::new();
    let out = Path::new("/dist/index.html");
    let written = page.write_to(&fs, out)?;
    assert_eq!(written, html.len());
    assert_eq!(fs.contents(out), Some(html.into_bytes()));
    Ok(())
}

#[test]
fn resume_sections_render_below_the_canvas() -> TestResult {
    let mut raw = PortfolioBuilder::new()
        .with_name("Ada Example")
        .with_task(TaskSpecBuilder::new("edu").title("Education").build())
        .build_raw();
    raw.experience.push(ExperienceEntry {
        role: "Engineer".into(),
        company: "Analytical Engines Ltd".into(),
        period: "1843 - 1852".into(),
        achievements: vec!["Wrote the first published program".into()],
    });
    let data = PortfolioFile::try_from(raw)?;
    let page = Page::build(&data, Arc::new(PageServices::default()))?;

    let doc = page.canvas().document();
    let section = doc.get_element_by_id("experience").ok_or("experience section missing")?;
    assert!(doc.has_class(section, "resume-section"));
    assert_eq!(doc.get_element_by_id("education"), None);

    let html = page.render_html();
    assert!(html.contains("Engineer · Analytical Engines Ltd"));
    assert!(html.contains("<li>Wrote the first published program</li>"));
    Ok(())
}

const SAMPLE: &str = r#"
[profile]
name = "Ada Example"
headline = "Engineer"

[simulation]
min_delay_ms = 1
max_delay_ms = 2
failure_rate = 0.0

[[tasks]]
id = "edu"
title = "Education"
type = "education"

[[tasks]]
id = "exp"
title = "Experience"
type = "experience"
dependencies = ["edu"]

[[experience]]
role = "Engineer"
company = "Analytical Engines Ltd"
"#;

#[tokio::test]
async fn run_writes_the_page_and_snapshot() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let data = dir.path().join("portfolio.toml");
    fs::write(&data, SAMPLE)?;
    let out = dir.path().join("dist").join("index.html");
    let state = dir.path().join("state");

    let args = CliArgs::try_parse_from([
        "dagfolio",
        "--data",
        data.to_str().ok_or("non-utf8 path")?,
        "--out",
        out.to_str().ok_or("non-utf8 path")?,
        "--snapshot-dir",
        state.to_str().ok_or("non-utf8 path")?,
        "--simulate",
        "--seed",
        "3",
    ])?;
    with_timeout(run(args)).await?;

    let html = fs::read_to_string(&out)?;
    assert!(html.contains("Ada Example"));
    assert!(html.contains("task-education status-success"));
    assert!(state.join("dagfolio-state.json").exists());

    // A second render restores from the snapshot it just wrote.
    let args = CliArgs::try_parse_from([
        "dagfolio",
        "--data",
        data.to_str().ok_or("non-utf8 path")?,
        "--out",
        out.to_str().ok_or("non-utf8 path")?,
        "--snapshot-dir",
        state.to_str().ok_or("non-utf8 path")?,
        "--restore",
    ])?;
    with_timeout(run(args)).await?;
    assert!(fs::read_to_string(&out)?.contains("task-experience status-success"));
    Ok(())
}

#[tokio::test]
async fn dry_run_writes_nothing() -> TestResult {
    let dir = TempDir::new()?;
    let data = dir.path().join("portfolio.toml");
    fs::write(&data, SAMPLE)?;
    let out = dir.path().join("index.html");

    let args = CliArgs::try_parse_from([
        "dagfolio",
        "--data",
        data.to_str().ok_or("non-utf8 path")?,
        "--out",
        out.to_str().ok_or("non-utf8 path")?,
        "--dry-run",
    ])?;
    with_timeout(run(args)).await?;
    assert!(!out.exists());
    Ok(())
}
