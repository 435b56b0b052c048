// tests/snapshot_store.rs

mod common;
use crate::common::{add_task, init_tracing, test_canvas};

use std::error::Error;
use std::path::PathBuf;

use tempfile::TempDir;

use dagfolio::canvas::WorkflowCanvas;
use dagfolio::fs::{MockFileSystem, RealFileSystem};
use dagfolio::render::GroupNode;
use dagfolio::storage::{fingerprint, Snapshot, SnapshotStore, SNAPSHOT_VERSION};
use dagfolio::types::{Point, TaskStatus};

type TestResult = Result<(), Box<dyn Error>>;

fn resume_canvas() -> WorkflowCanvas {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "edu", &[], 50.0, 50.0);
    add_task(&mut canvas, "exp", &["edu"], 350.0, 50.0);
    add_task(&mut canvas, "skills", &["edu", "exp"], 650.0, 50.0);
    canvas.add_group(
        GroupNode::new("early", "Early years", vec!["edu".into(), "exp".into()]),
        50.0,
        400.0,
    );
    canvas.connect_dependencies();
    canvas
}

fn store() -> SnapshotStore<MockFileSystem> {
    SnapshotStore::new(MockFileSystem::new(), "/state")
}

#[test]
fn snapshot_round_trips_through_the_store() -> TestResult {
    init_tracing();
    let store = store();
    assert_eq!(store.path(), PathBuf::from("/state/dagfolio-state.json"));

    let mut original = resume_canvas();
    original.run_task("edu");
    original.set_task_status("edu", TaskStatus::Success);
    original.move_node("exp", 400.0, 120.0);
    original.toggle_group("early");
    original.add_connection("early", "skills", true, Some("shortcut"));
    original.zoom(2.0, Some(Point::new(100.0, 100.0)));
    assert!(store.save(&original));
    assert!(store.fs().contents(store.path()).is_some());

    let mut restored = resume_canvas();
    assert!(store.restore(&mut restored));

    assert_eq!(restored.task_status("edu"), Some(TaskStatus::Success));
    assert_eq!(restored.task_status("exp"), Some(TaskStatus::Pending));
    assert_eq!(
        restored.index().get("exp").map(|e| e.position()),
        Some(Point::new(400.0, 120.0))
    );
    assert_eq!(restored.index().group("early").map(|g| g.expanded), Some(false));
    assert_eq!(restored.viewport().scale(), 2.0);
    assert_eq!(restored.viewport().pan(), original.viewport().pan());

    // Only the explicit edge is stored; derived ones come from the data.
    let explicit: Vec<_> = restored.connections().iter().filter(|c| !c.derived).collect();
    assert_eq!(explicit.len(), 1);
    assert_eq!(explicit[0].label.as_deref(), Some("shortcut"));
    Ok(())
}

#[test]
fn snapshot_from_other_data_is_ignored() -> TestResult {
    let store = store();
    let mut original = resume_canvas();
    original.run_task("edu");
    assert!(store.save(&original));

    let (mut other, _) = test_canvas();
    add_task(&mut other, "edu", &[], 0.0, 0.0);
    add_task(&mut other, "exp", &[], 300.0, 0.0);
    assert_ne!(fingerprint(&original), fingerprint(&other));

    assert!(!store.restore(&mut other));
    assert_eq!(other.task_status("edu"), Some(TaskStatus::Pending));
    Ok(())
}

#[test]
fn fingerprint_ignores_declaration_order() -> TestResult {
    let (mut a, _) = test_canvas();
    add_task(&mut a, "edu", &[], 0.0, 0.0);
    add_task(&mut a, "exp", &["edu"], 0.0, 0.0);

    let (mut b, _) = test_canvas();
    add_task(&mut b, "exp", &["edu"], 500.0, 0.0);
    add_task(&mut b, "edu", &[], 0.0, 0.0);

    assert_eq!(fingerprint(&a), fingerprint(&b));
    Ok(())
}

#[test]
fn corrupt_or_foreign_snapshots_are_ignored() -> TestResult {
    init_tracing();
    let store = store();
    let mut canvas = resume_canvas();

    assert!(store.load().is_none());
    assert!(!store.restore(&mut canvas));

    store.fs().add_file(store.path(), "{ not json");
    assert!(store.load().is_none());
    assert!(!store.restore(&mut canvas));

    let mut future = Snapshot::capture(&canvas);
    future.version = SNAPSHOT_VERSION + 1;
    store.fs().add_file(store.path(), serde_json::to_vec(&future)?);
    assert!(store.load().is_none());
    Ok(())
}

#[test]
fn failed_writes_are_reported_not_raised() -> TestResult {
    let store = store();
    store.fs().set_fail_writes(true);
    assert!(!store.save(&resume_canvas()));
    assert!(store.fs().paths().is_empty());
    Ok(())
}

#[test]
fn clear_removes_the_stored_snapshot() -> TestResult {
    let store = store();
    assert!(store.clear());
    assert!(store.save(&resume_canvas()));
    assert!(store.clear());
    assert!(store.load().is_none());
    assert!(store.clear());
    Ok(())
}

#[test]
fn real_filesystem_creates_the_snapshot_directory() -> TestResult {
    let dir = TempDir::new()?;
    let store = SnapshotStore::new(RealFileSystem, dir.path().join("nested").join("state"));
    assert!(store.save(&resume_canvas()));
    assert!(store.path().exists());

    let snapshot = store.load().ok_or("snapshot not readable")?;
    assert_eq!(snapshot.tasks.len(), 3);
    assert_eq!(snapshot.groups.len(), 1);
    assert!(snapshot.connections.is_empty());
    Ok(())
}
