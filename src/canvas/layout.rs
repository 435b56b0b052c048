// src/canvas/layout.rs

//! Auto-layout and viewport fitting math.

use std::collections::HashMap;

use crate::dag::levels::{compute_levels, tasks_by_level};
use crate::dag::DagGraph;
use crate::render::style::{GROUP_WIDTH, TASK_HEIGHT, TASK_WIDTH};
use crate::types::{NodeId, Point, Rect};

pub const LAYOUT_START_X: f64 = 50.0;
pub const LAYOUT_START_Y: f64 = 50.0;
/// Horizontal distance between two levels.
pub const LEVEL_SPACING: f64 = TASK_WIDTH + 100.0;
/// Vertical distance between two tasks of the same level.
pub const ROW_SPACING: f64 = TASK_HEIGHT + 40.0;
/// Gap between the lowest task and the first row of groups.
pub const GROUP_GAP: f64 = 100.0;
pub const GROUP_SPACING: f64 = 40.0;
pub const GROUPS_PER_ROW: usize = 3;
/// Share of the visible area a fitted DAG may use.
pub const FIT_PADDING: f64 = 0.9;

/// Result of an auto-layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    pub levels: HashMap<NodeId, usize>,
    pub tasks: Vec<(NodeId, Point)>,
    pub groups: Vec<(NodeId, Point)>,
}

/// Place tasks left-to-right by level and top-to-bottom within a level,
/// then groups in rows below the lowest task.
///
/// `groups` carries each group's id and current height.
pub fn plan_layout(graph: &DagGraph, groups: &[(NodeId, f64)]) -> LayoutPlan {
    let levels = compute_levels(graph);
    let columns = tasks_by_level(graph, &levels);

    let mut tasks = Vec::with_capacity(graph.len());
    let mut lowest: Option<f64> = None;
    for ids in &columns {
        for (row, id) in ids.iter().enumerate() {
            let level = levels.get(id).copied().unwrap_or(0);
            let p = Point::new(
                LAYOUT_START_X + level as f64 * LEVEL_SPACING,
                LAYOUT_START_Y + row as f64 * ROW_SPACING,
            );
            lowest = Some(lowest.map_or(p.y, |l: f64| l.max(p.y)));
            tasks.push((id.clone(), p));
        }
    }

    let mut placed_groups = Vec::with_capacity(groups.len());
    let mut row_y = lowest.map_or(LAYOUT_START_Y, |y| y + TASK_HEIGHT + GROUP_GAP);
    for row in groups.chunks(GROUPS_PER_ROW) {
        let mut tallest: f64 = 0.0;
        for (col, (id, height)) in row.iter().enumerate() {
            let x = LAYOUT_START_X + col as f64 * (GROUP_WIDTH + GROUP_SPACING);
            placed_groups.push((id.clone(), Point::new(x, row_y)));
            tallest = tallest.max(*height);
        }
        row_y += tallest + GROUP_SPACING;
    }

    LayoutPlan {
        levels,
        tasks,
        groups: placed_groups,
    }
}

/// Bounding box of task positions using the nominal task size.
pub fn task_bounds<I>(positions: I) -> Option<Rect>
where
    I: IntoIterator<Item = Point>,
{
    Rect::bounding(positions.into_iter().map(|p| (p, TASK_WIDTH, TASK_HEIGHT)))
}

/// Scale that fits `bounds` into a `width` x `height` area (with
/// [`FIT_PADDING`]), clamped to `[min_scale, max_scale]`.
pub fn fit_scale(bounds: Rect, width: f64, height: f64, min_scale: f64, max_scale: f64) -> f64 {
    let sx = if bounds.width > 0.0 {
        width * FIT_PADDING / bounds.width
    } else {
        max_scale
    };
    let sy = if bounds.height > 0.0 {
        height * FIT_PADDING / bounds.height
    } else {
        max_scale
    };
    sx.min(sy).clamp(min_scale, max_scale)
}

/// Pan that puts the centre of `bounds` at the centre of the visible area.
pub fn center_pan(bounds: Rect, width: f64, height: f64, scale: f64) -> Point {
    let c = bounds.center();
    Point::new(width / 2.0 - c.x * scale, height / 2.0 - c.y * scale)
}
