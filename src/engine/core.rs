// src/engine/core.rs

//! Pure simulator state machine.
//!
//! [`SimulatorCore`] consumes [`SimEvent`]s and returns the [`SimCommand`]s
//! the shell should carry out. It owns no canvas, channels or timers and is
//! unit tested directly.

use tracing::debug;

use crate::dag::{execution_order, DagGraph};
use crate::engine::{SimCommand, SimEvent, SimState, SimSummary};
use crate::types::{NodeId, TaskStatus};

/// Result of one [`SimulatorCore::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStep {
    pub commands: Vec<SimCommand>,
    /// `false` once the shell has nothing left to wait for.
    pub keep_running: bool,
}

impl SimStep {
    fn new(commands: Vec<SimCommand>, keep_running: bool) -> Self {
        Self {
            commands,
            keep_running,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorCore {
    order: Vec<NodeId>,
    cursor: usize,
    state: SimState,
    in_flight: Option<NodeId>,
    summary: SimSummary,
}

impl SimulatorCore {
    /// Visit `order` front to back.
    pub fn new(order: Vec<NodeId>) -> Self {
        Self {
            order,
            cursor: 0,
            state: SimState::Idle,
            in_flight: None,
            summary: SimSummary::default(),
        }
    }

    /// Visit the graph's tasks in DFS post-order.
    pub fn from_graph(graph: &DagGraph) -> Self {
        Self::new(execution_order(graph))
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn summary(&self) -> SimSummary {
        self.summary
    }

    pub fn step(&mut self, event: SimEvent) -> SimStep {
        debug!(?event, state = ?self.state, "simulator step");
        match event {
            SimEvent::Start => self.start(),
            SimEvent::TaskFinished { task, outcome } => {
                if self.in_flight.as_deref() != Some(task.as_str()) {
                    debug!(task = %task, "stale task completion ignored");
                    return SimStep::new(Vec::new(), self.waiting());
                }
                self.in_flight = None;
                let status = outcome.status();
                match status {
                    TaskStatus::Failed => self.summary.failed += 1,
                    _ => self.summary.succeeded += 1,
                }
                let mut commands = vec![SimCommand::SetStatus { task, status }];
                match self.state {
                    SimState::Running => {
                        let next = self.dispatch_next();
                        let keep = next.keep_running;
                        commands.extend(next.commands);
                        SimStep::new(commands, keep)
                    }
                    SimState::Stopped => {
                        commands.extend(self.finish_commands("Simulation stopped"));
                        SimStep::new(commands, false)
                    }
                    _ => SimStep::new(commands, self.waiting()),
                }
            }
            SimEvent::Pause => {
                if self.state != SimState::Running {
                    return SimStep::new(Vec::new(), self.waiting());
                }
                self.state = SimState::Paused;
                SimStep::new(vec![SimCommand::Announce("Simulation paused".into())], true)
            }
            SimEvent::Resume => {
                if self.state != SimState::Paused {
                    return SimStep::new(Vec::new(), self.waiting());
                }
                self.state = SimState::Running;
                let mut commands = vec![SimCommand::Announce("Simulation resumed".into())];
                if self.in_flight.is_some() {
                    return SimStep::new(commands, true);
                }
                let next = self.dispatch_next();
                commands.extend(next.commands);
                SimStep::new(commands, next.keep_running)
            }
            SimEvent::Stop => {
                if !matches!(self.state, SimState::Running | SimState::Paused) {
                    return SimStep::new(Vec::new(), false);
                }
                self.state = SimState::Stopped;
                if self.in_flight.is_some() {
                    // The timer in flight still lands once; finish then.
                    return SimStep::new(Vec::new(), true);
                }
                SimStep::new(self.finish_commands("Simulation stopped"), false)
            }
            SimEvent::Reset => {
                self.state = SimState::Idle;
                self.cursor = 0;
                self.in_flight = None;
                self.summary = SimSummary::default();
                SimStep::new(self.reset_commands(), false)
            }
        }
    }

    fn start(&mut self) -> SimStep {
        match self.state {
            SimState::Running => return SimStep::new(Vec::new(), true),
            SimState::Paused => return self.step(SimEvent::Resume),
            SimState::Idle | SimState::Stopped | SimState::Finished => {}
        }
        if self.in_flight.is_some() {
            // Restarted while the last timer of a stopped run is pending.
            return SimStep::new(Vec::new(), true);
        }

        self.cursor = 0;
        self.summary = SimSummary::default();
        self.state = SimState::Running;

        let mut commands = self.reset_commands();
        commands.push(SimCommand::Announce("Simulation started".into()));
        let next = self.dispatch_next();
        commands.extend(next.commands);
        SimStep::new(commands, next.keep_running)
    }

    fn dispatch_next(&mut self) -> SimStep {
        let Some(task) = self.order.get(self.cursor).cloned() else {
            self.state = SimState::Finished;
            return SimStep::new(self.finish_commands("Simulation finished"), false);
        };
        self.cursor += 1;
        self.in_flight = Some(task.clone());
        SimStep::new(
            vec![
                SimCommand::SetStatus {
                    task: task.clone(),
                    status: TaskStatus::Running,
                },
                SimCommand::Dispatch { task },
            ],
            true,
        )
    }

    fn reset_commands(&self) -> Vec<SimCommand> {
        self.order
            .iter()
            .map(|task| SimCommand::SetStatus {
                task: task.clone(),
                status: TaskStatus::Pending,
            })
            .collect()
    }

    fn finish_commands(&mut self, headline: &str) -> Vec<SimCommand> {
        self.summary.skipped = self.order.len().saturating_sub(self.cursor);
        let s = self.summary;
        vec![
            SimCommand::Announce(format!(
                "{headline}: {} succeeded, {} failed",
                s.succeeded, s.failed
            )),
            SimCommand::Finished(s),
        ]
    }

    /// Whether the shell still has something to wait for.
    fn waiting(&self) -> bool {
        match self.state {
            SimState::Running | SimState::Paused => true,
            SimState::Stopped => self.in_flight.is_some(),
            SimState::Idle | SimState::Finished => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TaskOutcome;

    fn core() -> SimulatorCore {
        SimulatorCore::new(vec!["a".into(), "b".into()])
    }

    fn finished(task: &str, outcome: TaskOutcome) -> SimEvent {
        SimEvent::TaskFinished {
            task: task.into(),
            outcome,
        }
    }

    #[test]
    fn runs_tasks_one_at_a_time() {
        let mut core = core();
        let step = core.step(SimEvent::Start);
        assert!(step.keep_running);
        assert!(step.commands.contains(&SimCommand::Dispatch { task: "a".into() }));
        assert!(!step.commands.contains(&SimCommand::Dispatch { task: "b".into() }));

        let step = core.step(finished("a", TaskOutcome::Success));
        assert_eq!(
            step.commands[0],
            SimCommand::SetStatus {
                task: "a".into(),
                status: TaskStatus::Success
            }
        );
        assert!(step.commands.contains(&SimCommand::Dispatch { task: "b".into() }));

        let step = core.step(finished("b", TaskOutcome::Failed));
        assert!(!step.keep_running);
        assert_eq!(core.state(), SimState::Finished);
        assert_eq!(
            core.summary(),
            SimSummary {
                succeeded: 1,
                failed: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn stop_lets_in_flight_timer_land_once() {
        let mut core = core();
        core.step(SimEvent::Start);
        let step = core.step(SimEvent::Stop);
        assert!(step.keep_running);
        assert!(step.commands.is_empty());

        let step = core.step(finished("a", TaskOutcome::Success));
        assert!(!step.keep_running);
        assert!(!step
            .commands
            .iter()
            .any(|c| matches!(c, SimCommand::Dispatch { .. })));
        assert_eq!(core.summary().skipped, 1);
    }

    #[test]
    fn pause_holds_next_dispatch_until_resume() {
        let mut core = core();
        core.step(SimEvent::Start);
        core.step(SimEvent::Pause);
        let step = core.step(finished("a", TaskOutcome::Success));
        assert!(step.keep_running);
        assert_eq!(step.commands.len(), 1);

        let step = core.step(SimEvent::Resume);
        assert!(step.commands.contains(&SimCommand::Dispatch { task: "b".into() }));
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut core = core();
        core.step(SimEvent::Start);
        let step = core.step(finished("b", TaskOutcome::Success));
        assert!(step.commands.is_empty());
        assert_eq!(core.in_flight(), Some("a"));
    }
}
