// src/engine/timers.rs

//! Pluggable timer backend.
//!
//! The simulation runtime never sleeps itself; it hands every dispatched task
//! to a [`TimerBackend`], which reports back with
//! [`SimEvent::TaskFinished`] on the runtime's channel.
//!
//! - [`TokioTimers`] sleeps on the Tokio clock (production).
//! - Tests can complete timers immediately or record them.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::{SimEvent, TaskOutcome};
use crate::errors::Result;
use crate::types::NodeId;

pub trait TimerBackend: Send {
    /// Arrange for `TaskFinished { task, outcome }` to arrive after `delay`.
    fn schedule(
        &mut self,
        task: NodeId,
        delay: Duration,
        outcome: TaskOutcome,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Spawns one Tokio task per timer.
#[derive(Debug, Clone)]
pub struct TokioTimers {
    tx: mpsc::Sender<SimEvent>,
}

impl TokioTimers {
    pub fn new(tx: mpsc::Sender<SimEvent>) -> Self {
        Self { tx }
    }
}

impl TimerBackend for TokioTimers {
    fn schedule(
        &mut self,
        task: NodeId,
        delay: Duration,
        outcome: TaskOutcome,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();
        Box::pin(async move {
            debug!(task = %task, delay_ms = delay.as_millis() as u64, "timer scheduled");
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if tx.send(SimEvent::TaskFinished { task, outcome }).await.is_err() {
                    warn!("simulation ended before a timer fired; dropping completion");
                }
            });
            Ok(())
        })
    }
}
