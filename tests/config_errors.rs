// tests/config_errors.rs

mod common;
use crate::common::builders::{PortfolioBuilder, TaskSpecBuilder};
use crate::common::init_tracing;

use std::error::Error;
use std::fs;
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;

use dagfolio::canvas::WorkflowCanvas;
use dagfolio::cli::CliArgs;
use dagfolio::config::{
    dependency_warnings, load_and_validate, parse_str, CanvasSettings, DataFormat, GroupMember,
    PortfolioFile, SimulationSettings,
};
use dagfolio::dom::Document;
use dagfolio::errors::DagfolioError;
use dagfolio::services::NoopServices;
use dagfolio::types::Category;

type TestResult = Result<(), Box<dyn Error>>;

fn config_message(result: Result<PortfolioFile, DagfolioError>) -> String {
    match result {
        Err(DagfolioError::ConfigError(msg)) => msg,
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn canvas_without_container_fails_to_mount() -> TestResult {
    init_tracing();
    let err = WorkflowCanvas::new(
        Document::new(),
        "dag-canvas",
        CanvasSettings::default(),
        Arc::new(NoopServices),
    )
    .unwrap_err();
    assert!(matches!(&err, DagfolioError::MissingContainer(id) if id == "dag-canvas"));
    assert_eq!(err.to_string(), "Canvas container not found: #dag-canvas");
    Ok(())
}

#[test]
fn toml_file_loads_with_defaults_and_fallbacks() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let path = dir.path().join("portfolio.toml");
    fs::write(
        &path,
        r#"
[profile]
name = "Ada Example"

[canvas]
max_scale = 2.5

[[tasks]]
id = "edu"
title = "Education"
type = "education"

[[tasks]]
id = "exp"
title = "Experience"
type = "astronaut"
status = "queued"
dependencies = ["edu"]
position = { x = 300.0, y = 40.0 }

[[task_groups]]
id = "career"
title = "Career"
tasks = ["exp", { id = "mentoring", title = "Mentoring", dependencies = ["exp"] }]
"#,
    )?;

    let data = load_and_validate(&path)?;
    assert_eq!(data.profile.name, "Ada Example");
    assert_eq!(data.canvas.max_scale, 2.5);
    assert_eq!(data.canvas.min_scale, 0.2);
    assert_eq!(data.simulation, SimulationSettings::default());

    assert_eq!(data.tasks[0].category, Category::Education);
    assert_eq!(data.tasks[1].category, Category::Generic);
    assert_eq!(data.tasks[1].status, "queued");
    assert_eq!(data.tasks[1].position.x, 300.0);

    let group = &data.task_groups[0];
    assert!(group.expanded);
    assert_eq!(group.member_ids(), vec!["exp", "mentoring"]);
    assert!(matches!(group.tasks[1], GroupMember::Inline(_)));

    let all = data.all_tasks();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].group.as_deref(), Some("career"));
    Ok(())
}

#[test]
fn json_accepts_the_camel_case_group_key() -> TestResult {
    let raw = parse_str(
        r#"{
            "tasks": [
                { "id": "a", "title": "A" },
                { "id": "b", "title": "B", "dependencies": ["a"] }
            ],
            "taskGroups": [ { "id": "g", "title": "G", "tasks": ["a", "b"] } ]
        }"#,
        DataFormat::Json,
    )?;
    let data = PortfolioFile::try_from(raw)?;
    assert_eq!(data.task_groups.len(), 1);
    assert_eq!(data.task_groups[0].member_ids(), vec!["a", "b"]);
    Ok(())
}

#[test]
fn data_format_follows_the_extension() {
    use std::path::Path;
    assert_eq!(DataFormat::from_path(Path::new("cv.JSON")), DataFormat::Json);
    assert_eq!(DataFormat::from_path(Path::new("cv.toml")), DataFormat::Toml);
    assert_eq!(DataFormat::from_path(Path::new("cv")), DataFormat::Toml);
}

#[test]
fn empty_task_list_is_rejected() {
    let msg = config_message(PortfolioFile::try_from(PortfolioBuilder::new().build_raw()));
    assert_eq!(msg, "portfolio must contain at least one [[tasks]] entry");
}

#[test]
fn duplicate_and_malformed_ids_are_rejected() {
    let dup = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("edu").build())
        .with_task(TaskSpecBuilder::new("edu").build())
        .build_raw();
    assert_eq!(config_message(PortfolioFile::try_from(dup)), "duplicate id 'edu'");

    // Tasks and groups share one namespace.
    let clash = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("edu").build())
        .with_group("edu", "Edu", &[])
        .build_raw();
    assert_eq!(config_message(PortfolioFile::try_from(clash)), "duplicate id 'edu'");

    let bad = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("my task").build())
        .build_raw();
    assert_eq!(
        config_message(PortfolioFile::try_from(bad)),
        "invalid id 'my task' (use letters, digits, '-' and '_')"
    );
}

#[test]
fn group_member_must_exist() {
    let raw = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("edu").build())
        .with_group("g", "G", &["edu", "ghost"])
        .build_raw();
    assert_eq!(
        config_message(PortfolioFile::try_from(raw)),
        "group 'g' references unknown task 'ghost'"
    );
}

#[test]
fn out_of_range_settings_are_rejected() {
    let canvas = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("edu").build())
        .with_canvas(CanvasSettings {
            min_scale: 2.0,
            max_scale: 1.0,
            ..CanvasSettings::default()
        })
        .build_raw();
    assert!(config_message(PortfolioFile::try_from(canvas)).contains("min_scale"));

    let simulation = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("edu").build())
        .with_simulation(SimulationSettings {
            failure_rate: 1.5,
            ..SimulationSettings::default()
        })
        .build_raw();
    assert!(config_message(PortfolioFile::try_from(simulation)).contains("failure_rate"));

    // NaN slips past ordering checks, so it is rejected up front.
    let nan = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("edu").build())
        .with_canvas(CanvasSettings {
            max_scale: f64::NAN,
            ..CanvasSettings::default()
        })
        .build_raw();
    assert_eq!(
        config_message(PortfolioFile::try_from(nan)),
        "[canvas].max_scale must be a finite number (got NaN)"
    );

    let infinite = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("edu").build())
        .with_canvas(CanvasSettings {
            width: f64::INFINITY,
            ..CanvasSettings::default()
        })
        .build_raw();
    assert!(config_message(PortfolioFile::try_from(infinite)).contains("[canvas].width"));
}

#[test]
fn nan_scale_in_a_data_file_is_a_config_error() -> TestResult {
    let raw = parse_str(
        "[canvas]\nmax_scale = nan\n\n[[tasks]]\nid = \"edu\"\ntitle = \"Education\"\n",
        DataFormat::Toml,
    )?;
    assert!(matches!(
        PortfolioFile::try_from(raw),
        Err(DagfolioError::ConfigError(msg)) if msg.contains("max_scale")
    ));
    Ok(())
}

#[test]
fn dependency_problems_are_warnings_not_errors() -> TestResult {
    let data = PortfolioBuilder::new()
        .with_task(TaskSpecBuilder::new("a").after("b").after("ghost").build())
        .with_task(TaskSpecBuilder::new("b").after("a").after("b").build())
        .build();
    let warnings = dependency_warnings(&data.all_tasks());

    assert!(warnings.iter().any(|w| w.contains("unknown dependency 'ghost'")));
    assert!(warnings.iter().any(|w| w.contains("'b' depends on itself")));
    assert!(warnings.iter().any(|w| w.contains("dependency cycle")));
    Ok(())
}

#[test]
fn malformed_files_surface_parser_errors() -> TestResult {
    let dir = TempDir::new()?;

    let toml_path = dir.path().join("broken.toml");
    fs::write(&toml_path, "[[tasks]\nid = ")?;
    assert!(matches!(load_and_validate(&toml_path), Err(DagfolioError::TomlError(_))));

    let json_path = dir.path().join("broken.json");
    fs::write(&json_path, "{ \"tasks\": [ ")?;
    assert!(matches!(load_and_validate(&json_path), Err(DagfolioError::JsonError(_))));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(load_and_validate(&missing), Err(DagfolioError::IoError(_))));
    Ok(())
}

#[test]
fn cli_restore_requires_a_snapshot_dir() {
    assert!(CliArgs::try_parse_from(["dagfolio", "--restore"]).is_err());

    let args = CliArgs::try_parse_from([
        "dagfolio",
        "--data",
        "cv.json",
        "--restore",
        "--snapshot-dir",
        ".state",
        "--seed",
        "42",
    ])
    .expect("valid arguments");
    assert_eq!(args.data, "cv.json");
    assert_eq!(args.seed, Some(42));
    assert!(args.restore);
    assert_eq!(args.out, "dist/index.html");
}

#[test]
fn bundled_demo_data_is_valid() -> TestResult {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/portfolio.toml");
    let data = load_and_validate(&path)?;
    assert_eq!(data.all_tasks().len(), 7);
    assert_eq!(data.task_groups[0].member_ids(), vec!["dag-viewer", "log-shipper"]);
    assert!(dependency_warnings(&data.all_tasks()).is_empty());
    assert_eq!(data.experience.len(), 2);
    Ok(())
}
