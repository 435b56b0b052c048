use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical task/group identifier type used throughout the crate.
pub type NodeId = String;

/// Visual status of a task.
///
/// Valid transitions are `Pending -> Running -> {Success, Failed}`, plus
/// `Running -> Pending` for an explicit reset. Everything else is refused by
/// [`TaskStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::Running,
        TaskStatus::Success,
        TaskStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
        }
    }

    /// Parse a status string, falling back to `Pending` for anything unknown.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Running, Success) | (Running, Failed) | (Running, Pending)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "success" => Ok(TaskStatus::Success),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(format!(
                "invalid task status: {other} (expected pending, running, success or failed)"
            )),
        }
    }
}

/// Resume section a task belongs to. Drives the icon and accent colour.
///
/// Unknown strings deserialize to `Generic` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    Education,
    Experience,
    Skills,
    Projects,
    Certifications,
    Generic,
}

impl Default for Category {
    fn default() -> Self {
        Category::Generic
    }
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Experience => "experience",
            Category::Skills => "skills",
            Category::Projects => "projects",
            Category::Certifications => "certifications",
            Category::Generic => "generic",
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "education" => Category::Education,
            "experience" => Category::Experience,
            "skills" | "skill" => Category::Skills,
            "projects" | "project" => Category::Projects,
            "certifications" | "certification" => Category::Certifications,
            _ => Category::Generic,
        }
    }
}

/// A point in canvas (or screen) coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest rectangle covering every `(position, width, height)` box.
    pub fn bounding<I>(boxes: I) -> Option<Rect>
    where
        I: IntoIterator<Item = (Point, f64, f64)>,
    {
        let mut iter = boxes.into_iter();
        let (first, w, h) = iter.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x + w, first.y + h);
        for (p, w, h) in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x + w);
            max_y = max_y.max(p.y + h);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn inflate(self, padding: f64) -> Rect {
        Rect::new(
            self.x - padding,
            self.y - padding,
            self.width + 2.0 * padding,
            self.height + 2.0 * padding,
        )
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Discriminant of an entry in the canvas node index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Task,
    Group,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_state_machine() {
        use TaskStatus::*;
        assert!(Pending.can_transition_to(Running));
        assert!(Running.can_transition_to(Failed));
        assert!(Running.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Success));
        assert!(!Success.can_transition_to(Running));
        assert!(!Failed.can_transition_to(Pending));
    }

    #[test]
    fn unknown_strings_fall_back() {
        assert_eq!(TaskStatus::parse_lenient("queued"), TaskStatus::Pending);
        assert_eq!(Category::from("hobbies".to_string()), Category::Generic);
        assert_eq!(Category::from("Skill".to_string()), Category::Skills);
    }
}
