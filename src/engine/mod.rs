// src/engine/mod.rs

//! Cosmetic execution simulator.
//!
//! Tasks are visited one at a time in dependency order; each one goes
//! `pending -> running -> success | failed` after a delay chosen by an
//! [`OutcomePolicy`]. Nothing is actually executed.
//!
//! The pure state machine lives in [`core`]; [`runtime`] is the async shell
//! that owns the canvas for the duration of a run, asks the policy for
//! delays and hands them to a [`TimerBackend`].

use crate::types::{NodeId, TaskStatus};

pub mod core;
pub mod policy;
pub mod runtime;
pub mod timers;

pub use self::core::{SimStep, SimulatorCore};
pub use policy::{Decision, OutcomePolicy, RandomPolicy};
pub use runtime::{SimulationHandle, SimulationRuntime};
pub use timers::{TimerBackend, TokioTimers};

/// How a simulated task ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
}

impl TaskOutcome {
    pub fn status(self) -> TaskStatus {
        match self {
            TaskOutcome::Success => TaskStatus::Success,
            TaskOutcome::Failed => TaskStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
    Finished,
}

/// Events consumed by [`SimulatorCore::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Start,
    /// A task's timer fired.
    TaskFinished { task: NodeId, outcome: TaskOutcome },
    Pause,
    Resume,
    Stop,
    /// Back to idle with every task pending.
    Reset,
}

/// What the shell must do after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCommand {
    SetStatus { task: NodeId, status: TaskStatus },
    /// Ask the policy for a delay/outcome and start a timer for `task`.
    Dispatch { task: NodeId },
    Announce(String),
    Finished(SimSummary),
}

/// Counts for a finished or stopped run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Tasks not reached before the run ended.
    pub skipped: usize,
}

