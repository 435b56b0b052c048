#![allow(dead_code)]

use dagfolio::config::model::{GroupMember, Profile};
use dagfolio::config::{
    CanvasSettings, GroupSpec, PortfolioFile, RawPortfolioFile, SimulationSettings, TaskSpec,
};
use dagfolio::types::{Category, Point};

/// Builder for `PortfolioFile` to simplify test setup.
pub struct PortfolioBuilder {
    raw: RawPortfolioFile,
}

impl PortfolioBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawPortfolioFile::default(),
        }
    }

    pub fn with_task(mut self, task: TaskSpec) -> Self {
        self.raw.tasks.push(task);
        self
    }

    /// Group whose members are referenced by id.
    pub fn with_group(mut self, id: &str, title: &str, members: &[&str]) -> Self {
        self.raw.task_groups.push(GroupSpec {
            id: id.to_string(),
            title: title.to_string(),
            tasks: members
                .iter()
                .map(|m| GroupMember::Id(m.to_string()))
                .collect(),
            expanded: true,
        });
        self
    }

    pub fn with_group_spec(mut self, group: GroupSpec) -> Self {
        self.raw.task_groups.push(group);
        self
    }

    pub fn with_canvas(mut self, canvas: CanvasSettings) -> Self {
        self.raw.canvas = canvas;
        self
    }

    pub fn with_simulation(mut self, simulation: SimulationSettings) -> Self {
        self.raw.simulation = simulation;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.raw.profile = Profile {
            name: name.to_string(),
            ..Profile::default()
        };
        self
    }

    pub fn build_raw(self) -> RawPortfolioFile {
        self.raw
    }

    pub fn build(self) -> PortfolioFile {
        PortfolioFile::try_from(self.raw).expect("Failed to build valid portfolio from builder")
    }
}

impl Default for PortfolioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskSpec`.
pub struct TaskSpecBuilder {
    task: TaskSpec,
}

impl TaskSpecBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            task: TaskSpec {
                id: id.to_string(),
                title: id.to_string(),
                category: Category::Generic,
                status: "pending".to_string(),
                dependencies: vec![],
                position: Point::default(),
                description: String::new(),
                details: vec![],
                group: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.task.category = category;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.dependencies.push(dep.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.task.status = status.to_string();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.task.position = Point::new(x, y);
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.task.description = text.to_string();
        self
    }

    pub fn detail(mut self, line: &str) -> Self {
        self.task.details.push(line.to_string());
        self
    }

    pub fn build(self) -> TaskSpec {
        self.task
    }
}

/// The four-task resume chain used throughout the tests:
/// `edu -> exp -> skills -> projects`, with `skills` also depending on `edu`.
pub fn resume_chain() -> PortfolioFile {
    PortfolioBuilder::new()
        .with_name("Ada Example")
        .with_task(TaskSpecBuilder::new("edu").title("Education").category(Category::Education).build())
        .with_task(
            TaskSpecBuilder::new("exp")
                .title("Experience")
                .category(Category::Experience)
                .after("edu")
                .build(),
        )
        .with_task(
            TaskSpecBuilder::new("skills")
                .title("Skills")
                .category(Category::Skills)
                .after("edu")
                .after("exp")
                .build(),
        )
        .with_task(
            TaskSpecBuilder::new("projects")
                .title("Projects")
                .category(Category::Projects)
                .after("skills")
                .build(),
        )
        .build()
}
