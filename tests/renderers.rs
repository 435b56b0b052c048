// tests/renderers.rs

mod common;
use crate::common::{add_task, init_tracing, test_canvas, TEST_CANVAS_ID};

use std::error::Error;

use dagfolio::dom::{Document, ElementId};
use dagfolio::model::{GroupProgress, Task};
use dagfolio::render::group_node::GROUP_TRANSITION;
use dagfolio::render::style::status_label;
use dagfolio::render::{GroupNode, TaskNode};
use dagfolio::types::TaskStatus;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn rendering_a_task_twice_reuses_the_card() -> TestResult {
    let mut doc = Document::new();
    let mut node = TaskNode::new(Task::new("edu", "Education"));
    let first = node.render(&mut doc, 10.0, 20.0);
    let second = node.render(&mut doc, 99.0, 99.0);

    assert_eq!(first, second);
    assert_eq!(doc.get_element_by_id("task-edu"), None, "card is not attached yet");
    assert_eq!(doc.style(first, "left"), Some("10px"));
    assert!(doc.has_class(first, "status-pending"));
    assert!(doc.has_class(first, "task-generic"));
    Ok(())
}

#[test]
fn card_carries_one_button_per_action() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "edu", &[], 0.0, 0.0);
    let card = canvas
        .index()
        .task("edu")
        .and_then(|n| n.element())
        .ok_or("card missing")?;
    let doc = canvas.document();
    let actions: Vec<&str> = doc
        .query_all(card, |el| el.tag == "button")
        .into_iter()
        .filter_map(|b| doc.attr(b, "data-action"))
        .collect();
    assert_eq!(actions, vec!["details", "logs", "run"]);
    Ok(())
}

#[test]
fn unknown_status_string_renders_as_pending() -> TestResult {
    init_tracing();
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "edu", &[], 0.0, 0.0);

    assert_eq!(canvas.update_task_status_str("edu", "Queued Up"), None);
    let card = canvas
        .index()
        .task("edu")
        .and_then(|n| n.element())
        .ok_or("card missing")?;
    let doc = canvas.document();
    assert!(doc.has_class(card, "status-queued-up"));
    assert!(!doc.has_class(card, "status-pending"));
    let status = doc
        .query_all(card, |el| el.classes.iter().any(|c| c == "task-status"))
        .first()
        .copied()
        .ok_or("status label missing")?;
    assert_eq!(doc.text(status), Some(status_label(TaskStatus::Pending)));
    assert_eq!(canvas.task_status("edu"), Some(TaskStatus::Pending));

    // Known strings go through the state machine, case-insensitively.
    assert_eq!(
        canvas.update_task_status_str("edu", "RUNNING"),
        Some(TaskStatus::Running)
    );
    assert_eq!(canvas.task_status("edu"), Some(TaskStatus::Running));
    Ok(())
}

#[test]
fn invalid_transitions_are_refused() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "edu", &[], 0.0, 0.0);

    assert!(!canvas.set_task_status("edu", TaskStatus::Success));
    assert_eq!(canvas.task_status("edu"), Some(TaskStatus::Pending));
    assert!(canvas.run_task("edu"));
    assert!(canvas.set_task_status("edu", TaskStatus::Success));
    assert!(!canvas.set_task_status("edu", TaskStatus::Running));
    assert!(!canvas.set_task_status("ghost", TaskStatus::Running));

    canvas.reset_statuses();
    assert_eq!(canvas.task_status("edu"), Some(TaskStatus::Pending));
    Ok(())
}

#[test]
fn status_changes_are_published_on_the_bus() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "edu", &[], 0.0, 0.0);
    let mut rx = canvas.status_bus().subscribe();

    canvas.run_task("edu");
    canvas.set_task_status("edu", TaskStatus::Failed);

    let first = rx.try_recv()?;
    assert_eq!((first.from, first.to), (TaskStatus::Pending, TaskStatus::Running));
    let second = rx.try_recv()?;
    assert_eq!(second.task, "edu");
    assert_eq!(second.to, TaskStatus::Failed);
    assert!(rx.try_recv().is_err());
    Ok(())
}

#[test]
fn group_progress_and_aggregate_follow_members() -> TestResult {
    let (mut canvas, _) = test_canvas();
    for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
        add_task(&mut canvas, id, &[], i as f64 * 300.0, 0.0);
    }
    canvas.add_group(
        GroupNode::new("g", "Group", vec!["a".into(), "b".into(), "c".into()]),
        0.0,
        300.0,
    );
    assert_eq!(canvas.group_status("g"), Some(TaskStatus::Pending));

    canvas.force_task_status("a", TaskStatus::Success);
    canvas.force_task_status("b", TaskStatus::Running);
    assert_eq!(
        canvas.group_progress("g"),
        Some(GroupProgress {
            completed: 1,
            running: 1,
            failed: 0,
            total: 3,
            percentage: 33,
        })
    );
    assert_eq!(canvas.group_status("g"), Some(TaskStatus::Running));

    canvas.force_task_status("c", TaskStatus::Failed);
    assert_eq!(canvas.group_status("g"), Some(TaskStatus::Failed));

    for id in ["b", "c"] {
        canvas.force_task_status(id, TaskStatus::Success);
    }
    assert_eq!(canvas.group_status("g"), Some(TaskStatus::Success));

    let el = canvas.index().group("g").and_then(|g| g.element()).ok_or("group card missing")?;
    let doc = canvas.document();
    assert!(doc.has_class(el, "status-success"));
    let bar = doc
        .query_all(el, |e| e.classes.iter().any(|c| c == "group-progress"))
        .first()
        .copied()
        .ok_or("progress bar missing")?;
    assert_eq!(doc.attr(bar, "aria-valuenow"), Some("100"));
    Ok(())
}

#[test]
fn group_bounds_track_member_positions() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "a", &[], 0.0, 0.0);
    add_task(&mut canvas, "b", &[], 300.0, 100.0);
    canvas.add_group(GroupNode::new("g", "Group", vec!["a".into(), "b".into()]), 0.0, 400.0);

    let bounds = canvas.index().group("g").and_then(|g| g.bounds()).ok_or("no bounds")?;
    assert_eq!((bounds.x, bounds.y), (-20.0, -20.0));
    assert_eq!((bounds.width, bounds.height), (540.0, 220.0));

    canvas.move_node("b", 600.0, 100.0);
    let bounds = canvas.index().group("g").and_then(|g| g.bounds()).ok_or("no bounds")?;
    assert_eq!(bounds.width, 840.0);
    Ok(())
}

#[test]
fn toggling_a_group_runs_a_transition() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "a", &[], 0.0, 0.0);
    canvas.add_group(GroupNode::new("g", "Group", vec!["a".into()]), 0.0, 300.0);
    let el = canvas.index().group("g").and_then(|g| g.element()).ok_or("group card missing")?;

    assert!(canvas.toggle_group("g"));
    let group = canvas.index().group("g").ok_or("group missing")?;
    assert!(!group.expanded);
    assert!(group.is_transitioning());
    assert!(canvas.document().has_class(el, "collapsed"));
    assert_eq!(canvas.document().attr(el, "aria-expanded"), Some("false"));

    canvas.tick(GROUP_TRANSITION);
    let group = canvas.index().group("g").ok_or("group missing")?;
    assert!(!group.is_transitioning());
    assert!(!canvas.document().has_class(el, "transitioning"));

    assert!(!canvas.toggle_group("nope"));
    Ok(())
}

#[test]
fn toggle_groups_collapses_all_then_expands_all() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "a", &[], 0.0, 0.0);
    add_task(&mut canvas, "b", &[], 300.0, 0.0);
    canvas.add_group(GroupNode::new("g1", "One", vec!["a".into()]), 0.0, 300.0);
    canvas.add_group(GroupNode::new("g2", "Two", vec!["b".into()]), 400.0, 300.0);
    canvas.toggle_group("g2");

    let expanded = |c: &dagfolio::canvas::WorkflowCanvas| {
        c.index().groups().map(|g| g.expanded).collect::<Vec<_>>()
    };

    canvas.toggle_groups();
    assert_eq!(expanded(&canvas), vec![false, false]);
    canvas.toggle_groups();
    assert_eq!(expanded(&canvas), vec![true, true]);
    Ok(())
}

#[test]
fn details_dialog_traps_focus_and_announces() -> TestResult {
    init_tracing();
    let (mut canvas, services) = test_canvas();
    let task = Task {
        description: "BSc, Computer Science".into(),
        details: vec!["Thesis on graph layout".into()],
        ..Task::new("edu", "Education")
    };
    canvas.add_task(task, 0.0, 0.0);

    let dialog = canvas.open_details("edu").ok_or("dialog not opened")?;
    assert_eq!(canvas.details_open_for(), Some("edu"));
    let doc = canvas.document();
    assert_eq!(doc.attr(dialog, "role"), Some("dialog"));
    assert_eq!(doc.attr(dialog, "aria-modal"), Some("true"));
    assert_eq!(
        doc.get_element_by_id(&format!("{TEST_CANVAS_ID}-details")),
        Some(dialog)
    );
    assert!(services
        .announcements()
        .contains(&"Details for Education opened".to_string()));

    let close = doc
        .query_all(dialog, |el| el.attrs.get("data-action").map(String::as_str) == Some("close-details"))
        .first()
        .copied()
        .ok_or("close button missing")?;
    // The close button is the only focusable element, so focus wraps onto it.
    assert_eq!(canvas.cycle_details_focus(false), Some(close));
    assert_eq!(canvas.cycle_details_focus(true), Some(close));

    // Reopening replaces the dialog rather than stacking a second one.
    canvas.open_details("edu");
    let dialogs = canvas
        .document()
        .query_all(canvas.container(), |el| el.classes.iter().any(|c| c == "details-modal"));
    assert_eq!(dialogs.len(), 1);

    assert!(canvas.close_details());
    assert!(!canvas.close_details());
    assert_eq!(canvas.details_open_for(), None);
    assert_eq!(canvas.cycle_details_focus(false), None);
    Ok(())
}

#[test]
fn node_actions_dispatch_by_name() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "edu", &[], 0.0, 0.0);

    assert!(canvas.handle_node_action("edu", "run"));
    assert_eq!(canvas.task_status("edu"), Some(TaskStatus::Running));

    assert!(canvas.handle_node_action("edu", "logs"));
    assert!(canvas.index().task("edu").is_some_and(|n| n.details_open()));

    assert!(canvas.handle_node_action("edu", "details"));
    assert_eq!(canvas.details_open_for(), Some("edu"));

    assert!(!canvas.handle_node_action("edu", "explode"));
    assert!(!canvas.handle_node_action("ghost", "details"));
    Ok(())
}

#[test]
fn re_adding_a_task_replaces_its_card() -> TestResult {
    let (mut canvas, _) = test_canvas();
    let first = canvas.add_task(Task::new("edu", "Education"), 0.0, 0.0);
    let second = canvas.add_task(Task::new("edu", "Education (MSc)"), 50.0, 0.0);

    assert_ne!(first, second);
    assert!(!canvas.document().is_connected(first));
    assert!(canvas.document().is_connected(second));
    assert_eq!(canvas.index().len(), 1);
    assert_eq!(canvas.task("edu").map(|t| t.title.as_str()), Some("Education (MSc)"));
    Ok(())
}

#[test]
fn re_adding_a_group_replaces_its_card() -> TestResult {
    let (mut canvas, _) = test_canvas();
    add_task(&mut canvas, "a", &[], 0.0, 0.0);
    let first = canvas.add_group(GroupNode::new("g", "Group", vec!["a".into()]), 0.0, 300.0);
    let second = canvas.add_group(GroupNode::new("g", "Renamed", vec!["a".into()]), 0.0, 300.0);

    assert_ne!(first, second);
    let doc = canvas.document();
    assert!(!doc.is_connected(first));
    let cards = doc.query_all(canvas.container(), |el| el.id.as_deref() == Some("group-g"));
    assert_eq!(cards, vec![second]);
    assert_eq!(canvas.index().groups().count(), 1);
    Ok(())
}

#[test]
fn repeating_a_position_update_changes_nothing() -> TestResult {
    let mut doc = Document::new();
    let root = doc.root();
    let mut task = TaskNode::new(Task::new("edu", "Education"));
    let card = task.render(&mut doc, 0.0, 0.0);
    doc.append_child(root, card);
    let mut group = GroupNode::new("g", "Group", vec!["edu".into()]);
    let group_card = group.render(&mut doc, 0.0, 300.0, &[]);
    doc.append_child(root, group_card);

    let shape = |doc: &Document, el: ElementId| {
        (
            doc.style(el, "left").map(str::to_string),
            doc.style(el, "top").map(str::to_string),
            doc.children(el).len(),
        )
    };

    task.update_position(&mut doc, 120.0, 40.0);
    group.update_position(&mut doc, 10.0, 400.0);
    let before = (shape(&doc, card), shape(&doc, group_card), doc.children(root).len());

    task.update_position(&mut doc, 120.0, 40.0);
    group.update_position(&mut doc, 10.0, 400.0);
    let after = (shape(&doc, card), shape(&doc, group_card), doc.children(root).len());

    assert_eq!(before, after);
    assert_eq!(doc.style(card, "left"), Some("120px"));
    assert_eq!(doc.style(group_card, "top"), Some("400px"));
    Ok(())
}
