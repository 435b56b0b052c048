// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::canvas::WorkflowCanvas;
use crate::engine::core::SimulatorCore;
use crate::engine::policy::OutcomePolicy;
use crate::engine::timers::TimerBackend;
use crate::engine::{SimCommand, SimEvent, SimSummary, TaskOutcome};
use crate::errors::{Error, Result};
use crate::types::{NodeId, TaskStatus};

/// Sends control events (pause, resume, stop) to a running simulation.
#[derive(Debug, Clone)]
pub struct SimulationHandle {
    tx: mpsc::Sender<SimEvent>,
}

impl SimulationHandle {
    pub fn new(tx: mpsc::Sender<SimEvent>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, event: SimEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|e| Error::msg(format!("simulation is not running: {e}")).into())
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(SimEvent::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.send(SimEvent::Resume).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.send(SimEvent::Stop).await
    }
}

/// Async shell around [`SimulatorCore`].
///
/// The runtime owns the canvas while the simulation runs, so status changes
/// have a single writer; [`SimulationRuntime::run`] hands it back at the end.
pub struct SimulationRuntime<P: OutcomePolicy, T: TimerBackend> {
    core: SimulatorCore,
    canvas: WorkflowCanvas,
    policy: P,
    timers: T,
    event_rx: mpsc::Receiver<SimEvent>,
}

impl<P: OutcomePolicy, T: TimerBackend> fmt::Debug for SimulationRuntime<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationRuntime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<P: OutcomePolicy, T: TimerBackend> SimulationRuntime<P, T> {
    /// `event_rx` must be the receiving end of the channel the timer backend
    /// (and any [`SimulationHandle`]) sends on.
    pub fn new(
        core: SimulatorCore,
        canvas: WorkflowCanvas,
        policy: P,
        timers: T,
        event_rx: mpsc::Receiver<SimEvent>,
    ) -> Self {
        Self {
            core,
            canvas,
            policy,
            timers,
            event_rx,
        }
    }

    /// Start the simulation and process events until the core is done.
    ///
    /// Returns the canvas and the final counts. A closed channel ends the
    /// run early with whatever has been applied so far.
    pub async fn run(mut self) -> Result<(WorkflowCanvas, SimSummary)> {
        info!(tasks = self.core.order().len(), "simulation started");
        let mut summary = SimSummary::default();

        let mut event = SimEvent::Start;
        loop {
            debug!(?event, "simulation received event");
            let step = self.core.step(event);
            for command in step.commands {
                if let Some(done) = self.execute_command(command).await? {
                    summary = done;
                }
            }
            self.canvas.run_pending_frames(self.canvas.settings().max_redraw_attempts);

            if !step.keep_running {
                break;
            }
            event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    warn!("simulation event channel closed; ending run");
                    summary = self.core.summary();
                    break;
                }
            };
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "simulation finished"
        );
        Ok((self.canvas, summary))
    }

    async fn execute_command(&mut self, command: SimCommand) -> Result<Option<SimSummary>> {
        match command {
            SimCommand::SetStatus { task, status } => {
                self.apply_status(&task, status);
            }
            SimCommand::Dispatch { task } => {
                let Some(record) = self.canvas.task(&task) else {
                    warn!(task = %task, "dispatched task is not on the canvas; completing it");
                    self.timers
                        .schedule(task, Duration::ZERO, TaskOutcome::Success)
                        .await?;
                    return Ok(None);
                };
                let decision = self.policy.decide(record);
                debug!(
                    task = %task,
                    delay_ms = decision.delay.as_millis() as u64,
                    outcome = ?decision.outcome,
                    "task dispatched"
                );
                self.timers
                    .schedule(task, decision.delay, decision.outcome)
                    .await?;
            }
            SimCommand::Announce(message) => {
                self.canvas.services().announce(&message);
            }
            SimCommand::Finished(summary) => return Ok(Some(summary)),
        }
        Ok(None)
    }

    fn apply_status(&mut self, task: &NodeId, status: TaskStatus) {
        let applied = if status == TaskStatus::Pending {
            self.canvas.force_task_status(task, status)
        } else {
            self.canvas.set_task_status(task, status)
        };
        if !applied {
            debug!(task = %task, %status, "status not applied");
        }
    }
}
