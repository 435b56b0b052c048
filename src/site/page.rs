// src/site/page.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::canvas::layout::plan_layout;
use crate::canvas::{WorkflowCanvas, FRAME};
use crate::config::model::{PortfolioFile, Profile, SimulationSettings};
use crate::dom::html::{body_to_html, escape_xml};
use crate::dom::{Document, ElementId};
use crate::engine::{
    OutcomePolicy, RandomPolicy, SimCommand, SimEvent, SimState, SimSummary, SimulationRuntime,
    SimulatorCore, TaskOutcome, TokioTimers,
};
use crate::errors::Result;
use crate::events::StatusAnnouncer;
use crate::fs::FileSystem;
use crate::model::Task;
use crate::render::GroupNode;
use crate::services::{CanvasServices, PageServices};
use crate::site::sections::{render_header, render_sections};
use crate::site::theme::stylesheet;
use crate::site::{ToolbarAction, CANVAS_ID, LIVE_REGION_ID};
use crate::types::{NodeId, TaskStatus};

/// A simulated task timer on the page's virtual clock.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTimer {
    due: Duration,
    task: NodeId,
    outcome: TaskOutcome,
}

/// The bootstrapped page: document, canvas, services and the toolbar's
/// simulator.
///
/// The page is the only owner of the services; the canvas gets them through
/// [`CanvasServices`].
pub struct Page {
    canvas: WorkflowCanvas,
    profile: Profile,
    services: Arc<PageServices>,
    announcer: StatusAnnouncer,
    live_region: ElementId,
    simulator: SimulatorCore,
    policy: Box<dyn OutcomePolicy>,
    clock: Duration,
    pending: Option<PendingTimer>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("canvas", &self.canvas)
            .field("simulator", &self.simulator)
            .field("clock", &self.clock)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Build the document, mount the canvas and register every task, group
    /// and dependency edge from `data`.
    ///
    /// Tasks keep the positions from the data file; groups are placed in
    /// rows below them.
    pub fn build(data: &PortfolioFile, services: Arc<PageServices>) -> Result<Self> {
        let mut doc = Document::new();
        let root = doc.root();

        render_header(&mut doc, root, &data.profile);
        render_toolbar(&mut doc, root);

        let main = doc.create_element("main");
        let mount = doc.create_element("div");
        doc.set_id(mount, CANVAS_ID);
        doc.append_child(main, mount);
        let live_region = crate::services::LiveRegion::mount(&mut doc, main, LIVE_REGION_ID);
        render_sections(&mut doc, main, data);
        doc.append_child(root, main);

        let canvas_services: Arc<dyn CanvasServices> = services.clone();
        let mut canvas = WorkflowCanvas::new(doc, CANVAS_ID, data.canvas, canvas_services)?;
        let announcer = StatusAnnouncer::new(canvas.status_bus());

        let specs = data.all_tasks();
        for spec in &specs {
            canvas.add_task(Task::from(spec), spec.position.x, spec.position.y);
            if spec.status.parse::<TaskStatus>().is_err() {
                canvas.update_task_status_str(&spec.id, &spec.status);
            }
        }

        let groups: Vec<GroupNode> = data.task_groups.iter().map(GroupNode::from_spec).collect();
        let heights: Vec<(NodeId, f64)> = groups.iter().map(|g| (g.id.clone(), g.height())).collect();
        let plan = plan_layout(&canvas.dependency_graph(), &heights);
        for (group, (_, at)) in groups.into_iter().zip(plan.groups) {
            canvas.add_group(group, at.x, at.y);
        }

        let edges = canvas.connect_dependencies();
        canvas.refresh();
        info!(
            tasks = specs.len(),
            groups = data.task_groups.len(),
            edges,
            "page built"
        );

        Ok(Self {
            canvas,
            profile: data.profile.clone(),
            services,
            announcer,
            live_region,
            simulator: SimulatorCore::new(Vec::new()),
            policy: Box::new(RandomPolicy::from_settings(&data.simulation)),
            clock: Duration::ZERO,
            pending: None,
        })
    }

    /// Replace the toolbar simulator's delay/outcome policy.
    pub fn with_policy(mut self, policy: impl OutcomePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn canvas(&self) -> &WorkflowCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut WorkflowCanvas {
        &mut self.canvas
    }

    pub fn services(&self) -> &Arc<PageServices> {
        &self.services
    }

    pub fn simulation_state(&self) -> SimState {
        self.simulator.state()
    }

    /// Run one toolbar action. Returns `false` when it had no effect.
    pub fn dispatch(&mut self, action: ToolbarAction) -> bool {
        debug!(%action, "toolbar action");
        let handled = match action {
            ToolbarAction::Run => self.start_simulation(),
            ToolbarAction::Pause => {
                let event = if self.simulator.state() == SimState::Paused {
                    SimEvent::Resume
                } else {
                    SimEvent::Pause
                };
                self.step_simulator(event)
            }
            ToolbarAction::Stop => self.step_simulator(SimEvent::Stop),
            ToolbarAction::ZoomIn => self.canvas.zoom_in(),
            ToolbarAction::ZoomOut => self.canvas.zoom_out(),
            ToolbarAction::Fit => self.canvas.fit_to_screen(),
            ToolbarAction::Center => self.canvas.center_dag(),
            ToolbarAction::ToggleGroups => {
                self.canvas.toggle_groups();
                true
            }
            ToolbarAction::Refresh => {
                self.canvas.refresh();
                true
            }
        };
        self.sync_live_region();
        handled
    }

    /// Parse a `data-toolbar-action` value and dispatch it.
    pub fn dispatch_str(&mut self, action: &str) -> Result<bool> {
        Ok(self.dispatch(action.parse()?))
    }

    fn start_simulation(&mut self) -> bool {
        if matches!(self.simulator.state(), SimState::Running | SimState::Paused) {
            return self.step_simulator(SimEvent::Start);
        }
        self.simulator = SimulatorCore::from_graph(&self.canvas.dependency_graph());
        self.pending = None;
        self.step_simulator(SimEvent::Start)
    }

    fn step_simulator(&mut self, event: SimEvent) -> bool {
        let before = self.simulator.state();
        let step = self.simulator.step(event);
        let changed = !step.commands.is_empty() || self.simulator.state() != before;
        let base = self.clock;
        self.apply_sim_commands(step.commands, base);
        changed
    }

    fn apply_sim_commands(&mut self, commands: Vec<SimCommand>, base: Duration) {
        for command in commands {
            match command {
                SimCommand::SetStatus { task, status } => {
                    if status == TaskStatus::Pending {
                        self.canvas.force_task_status(&task, status);
                    } else {
                        self.canvas.set_task_status(&task, status);
                    }
                }
                SimCommand::Dispatch { task } => {
                    let decision = match self.canvas.task(&task) {
                        Some(record) => self.policy.decide(record),
                        None => continue,
                    };
                    self.pending = Some(PendingTimer {
                        due: base + decision.delay,
                        task,
                        outcome: decision.outcome,
                    });
                }
                SimCommand::Announce(message) => {
                    // Status changes first, so the headline is the latest message.
                    self.announcer.drain(self.services.as_ref());
                    self.services.announce(&message);
                }
                SimCommand::Finished(summary) => {
                    info!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "toolbar simulation finished"
                    );
                }
            }
        }
    }

    /// Advance the page clock: canvas frames first, then any simulated task
    /// whose delay has passed. Announcements end up in the live region.
    pub fn tick(&mut self, elapsed: Duration) {
        self.clock += elapsed;
        self.canvas.tick(elapsed);

        while let Some(timer) = self.pending.take_if(|t| t.due <= self.clock) {
            let step = self.simulator.step(SimEvent::TaskFinished {
                task: timer.task,
                outcome: timer.outcome,
            });
            self.apply_sim_commands(step.commands, timer.due);
        }
        self.sync_live_region();
    }

    /// Tick frame by frame until the simulator and the canvas are idle, or
    /// `limit` of virtual time has passed. Returns the time spent.
    pub fn settle(&mut self, limit: Duration) -> Duration {
        let start = self.clock;
        while self.clock - start < limit {
            let busy = self.simulator.state() == SimState::Running
                || self.pending.is_some()
                || self.canvas.has_pending_frames();
            if !busy {
                break;
            }
            self.tick(FRAME);
        }
        self.clock - start
    }

    fn sync_live_region(&mut self) {
        self.announcer.drain(self.services.as_ref());
        if let Some(last) = self.services.announcements().last() {
            let el = self.live_region;
            self.canvas.document_mut().set_text(el, last.clone());
        }
    }

    /// Play a whole simulation on the Tokio clock with `policy`, using the
    /// async runtime. The page is handed back afterwards.
    pub async fn simulate<P: OutcomePolicy>(self, policy: P) -> Result<(Self, SimSummary)> {
        let Page {
            canvas,
            profile,
            services,
            announcer,
            live_region,
            policy: toolbar_policy,
            clock,
            ..
        } = self;

        let core = SimulatorCore::from_graph(&canvas.dependency_graph());
        let (tx, rx) = mpsc::channel(64);
        let runtime = SimulationRuntime::new(core, canvas, policy, TokioTimers::new(tx), rx);
        let (canvas, summary) = runtime.run().await?;

        let mut page = Page {
            canvas,
            profile,
            services,
            announcer,
            live_region,
            simulator: SimulatorCore::new(Vec::new()),
            policy: toolbar_policy,
            clock,
            pending: None,
        };
        page.sync_live_region();
        Ok((page, summary))
    }

    /// Convenience for [`Page::simulate`] with the production policy.
    pub async fn simulate_with_settings(self, settings: &SimulationSettings) -> Result<(Self, SimSummary)> {
        let policy = RandomPolicy::from_settings(settings);
        self.simulate(policy).await
    }

    /// The complete HTML document.
    pub fn render_html(&self) -> String {
        let title = if self.profile.name.is_empty() {
            "Resume DAG".to_string()
        } else {
            format!("{} · Resume DAG", self.profile.name)
        };
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            escape_xml(&title),
            stylesheet(),
            body_to_html(self.canvas.document())
        )
    }

    /// Render and write the page through `fs`.
    pub fn write_to<F: FileSystem>(&self, fs: &F, path: &Path) -> Result<usize> {
        let html = self.render_html();
        fs.write(path, html.as_bytes())?;
        info!(path = %path.display(), bytes = html.len(), "page written");
        Ok(html.len())
    }
}

fn render_toolbar(doc: &mut Document, parent: ElementId) -> ElementId {
    let nav = doc.create_element("nav");
    doc.add_class(nav, "toolbar");
    doc.set_attr(nav, "role", "toolbar");
    doc.set_attr(nav, "aria-label", "DAG controls");
    for action in ToolbarAction::ALL {
        let button = doc.create_element("button");
        doc.set_attr(button, "type", "button");
        doc.set_attr(button, "data-toolbar-action", action.as_str());
        doc.set_attr(button, "aria-label", action.label());
        doc.set_text(button, action.label());
        doc.append_child(nav, button);
    }
    doc.append_child(parent, nav);
    nav
}
