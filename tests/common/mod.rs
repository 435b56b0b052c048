#![allow(dead_code)]
#![allow(unused_imports)]

pub use dagfolio_test_utils::builders;
pub use dagfolio_test_utils::canvas::{add_task, test_canvas, test_canvas_with, TEST_CANVAS_ID};
pub use dagfolio_test_utils::{init_tracing, with_timeout};

use dagfolio::canvas::{RedrawOutcome, WorkflowCanvas};
use dagfolio::dom::ElementId;

/// Lay the document out and redraw every connection synchronously.
pub fn layout_and_redraw(canvas: &mut WorkflowCanvas) -> RedrawOutcome {
    canvas.document_mut().layout();
    canvas.redraw_all_connections()
}

/// The drawn path for `from -> to`, if any.
pub fn path_between(canvas: &WorkflowCanvas, from: &str, to: &str) -> Option<ElementId> {
    let doc = canvas.document();
    canvas
        .drawn_paths()
        .into_iter()
        .find(|p| doc.attr(*p, "data-from") == Some(from) && doc.attr(*p, "data-to") == Some(to))
}

/// The `d` attribute of the drawn path for `from -> to`.
pub fn path_d(canvas: &WorkflowCanvas, from: &str, to: &str) -> Option<String> {
    let el = path_between(canvas, from, to)?;
    canvas.document().attr(el, "d").map(str::to_string)
}
