use std::sync::Arc;

use dagfolio::canvas::WorkflowCanvas;
use dagfolio::config::CanvasSettings;
use dagfolio::dom::Document;
use dagfolio::model::Task;
use dagfolio::services::CanvasServices;

use crate::services::RecordingServices;

pub const TEST_CANVAS_ID: &str = "canvas";

/// A document whose body holds a single `<div id="{id}">`.
pub fn document_with_container(id: &str) -> Document {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.set_id(div, id);
    let root = doc.root();
    doc.append_child(root, div);
    doc
}

/// Canvas mounted on [`TEST_CANVAS_ID`] with default settings.
pub fn test_canvas() -> (WorkflowCanvas, RecordingServices) {
    test_canvas_with(CanvasSettings::default())
}

pub fn test_canvas_with(settings: CanvasSettings) -> (WorkflowCanvas, RecordingServices) {
    let services = RecordingServices::default();
    let shared: Arc<dyn CanvasServices> = Arc::new(services.clone());
    let canvas = WorkflowCanvas::new(
        document_with_container(TEST_CANVAS_ID),
        TEST_CANVAS_ID,
        settings,
        shared,
    )
    .expect("test container exists");
    (canvas, services)
}

/// Add `id` at `(x, y)` with the given dependencies.
pub fn add_task(canvas: &mut WorkflowCanvas, id: &str, deps: &[&str], x: f64, y: f64) {
    let task = Task::new(id, id).with_dependencies(deps.iter().copied());
    canvas.add_task(task, x, y);
}
