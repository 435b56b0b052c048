// src/config/model.rs

use serde::{Deserialize, Serialize};

use crate::types::{Category, NodeId, Point};

/// Top-level portfolio data as read from a TOML (or JSON) file.
///
/// ```toml
/// [profile]
/// name = "Ada Example"
/// headline = "Data engineer"
///
/// [canvas]
/// min_scale = 0.2
/// max_scale = 3.0
///
/// [[tasks]]
/// id = "edu"
/// title = "Education"
/// type = "education"
///
/// [[tasks]]
/// id = "exp"
/// title = "Experience"
/// type = "experience"
/// dependencies = ["edu"]
/// ```
///
/// This is the unvalidated form. Use [`PortfolioFile`] (via `TryFrom`) for
/// everything downstream.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPortfolioFile {
    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub canvas: CanvasSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,

    /// DAG nodes, in declaration order.
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,

    /// Optional clusters of tasks.
    #[serde(default, alias = "taskGroups")]
    pub task_groups: Vec<GroupSpec>,

    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,

    #[serde(default)]
    pub education: Vec<EducationEntry>,

    #[serde(default)]
    pub skills: Vec<SkillSet>,

    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

/// Validated portfolio data.
///
/// Only constructible through `TryFrom<RawPortfolioFile>` (or
/// [`PortfolioFile::new_unchecked`] from inside the config module), so holders
/// can rely on unique, well-formed ids and sane canvas/simulation settings.
#[derive(Debug, Clone)]
pub struct PortfolioFile {
    pub profile: Profile,
    pub canvas: CanvasSettings,
    pub simulation: SimulationSettings,
    pub tasks: Vec<TaskSpec>,
    pub task_groups: Vec<GroupSpec>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillSet>,
    pub projects: Vec<ProjectEntry>,
}

impl PortfolioFile {
    pub(crate) fn new_unchecked(raw: RawPortfolioFile) -> Self {
        Self {
            profile: raw.profile,
            canvas: raw.canvas,
            simulation: raw.simulation,
            tasks: raw.tasks,
            task_groups: raw.task_groups,
            experience: raw.experience,
            education: raw.education,
            skills: raw.skills,
            projects: raw.projects,
        }
    }

    /// Every task, including tasks declared inline inside a group.
    ///
    /// Inline tasks carry their owning group id in `group`.
    pub fn all_tasks(&self) -> Vec<TaskSpec> {
        let mut out = self.tasks.clone();
        for group in &self.task_groups {
            for member in &group.tasks {
                if let GroupMember::Inline(spec) = member {
                    let mut spec = spec.clone();
                    spec.group.get_or_insert_with(|| group.id.clone());
                    out.push(spec);
                }
            }
        }
        out
    }
}

/// `[profile]` section: header of the page.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// `[canvas]` section: viewport bounds and redraw behaviour.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct CanvasSettings {
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,

    #[serde(default = "default_max_scale")]
    pub max_scale: f64,

    /// Multiplier used by the zoom in/out toolbar buttons.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,

    /// Visible canvas area in screen pixels.
    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,

    /// How many frames a connection redraw waits for node layout before
    /// giving up.
    #[serde(default = "default_max_redraw_attempts")]
    pub max_redraw_attempts: u32,
}

fn default_min_scale() -> f64 {
    0.2
}

fn default_max_scale() -> f64 {
    3.0
}

fn default_zoom_step() -> f64 {
    1.2
}

fn default_width() -> f64 {
    1200.0
}

fn default_height() -> f64 {
    800.0
}

fn default_max_redraw_attempts() -> u32 {
    5
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            zoom_step: default_zoom_step(),
            width: default_width(),
            height: default_height(),
            max_redraw_attempts: default_max_redraw_attempts(),
        }
    }
}

/// `[simulation]` section: the randomized duration/outcome policy.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct SimulationSettings {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Probability in `[0, 1]` that a simulated task fails.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,

    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_failure_rate() -> f64 {
    0.1
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            failure_rate: default_failure_rate(),
            seed: None,
        }
    }
}

/// `[[tasks]]` entry: one DAG node.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TaskSpec {
    pub id: NodeId,

    pub title: String,

    #[serde(default, rename = "type")]
    pub category: Category,

    /// Initial status. Unknown strings are tolerated and rendered as pending.
    #[serde(default = "default_status")]
    pub status: String,

    /// Ids of tasks that conceptually precede this one.
    #[serde(default)]
    pub dependencies: Vec<NodeId>,

    #[serde(default)]
    pub position: Point,

    #[serde(default)]
    pub description: String,

    /// Bullet points shown in the expanded detail panel.
    #[serde(default)]
    pub details: Vec<String>,

    /// Owning group id, if any.
    #[serde(default)]
    pub group: Option<NodeId>,
}

fn default_status() -> String {
    "pending".to_string()
}

/// `[[task_groups]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GroupSpec {
    pub id: NodeId,

    pub title: String,

    /// Members, either as task ids or inline task descriptors.
    #[serde(default)]
    pub tasks: Vec<GroupMember>,

    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

fn default_expanded() -> bool {
    true
}

impl GroupSpec {
    /// Member ids in declaration order.
    pub fn member_ids(&self) -> Vec<NodeId> {
        self.tasks.iter().map(|m| m.id().to_string()).collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum GroupMember {
    Id(NodeId),
    Inline(TaskSpec),
}

impl GroupMember {
    pub fn id(&self) -> &str {
        match self {
            GroupMember::Id(id) => id,
            GroupMember::Inline(spec) => &spec.id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub period: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SkillSet {
    pub area: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: Option<String>,
}
