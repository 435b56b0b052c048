use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use dagfolio::engine::{SimEvent, TaskOutcome, TimerBackend};
use dagfolio::errors::Result;

/// A timer backend that:
/// - records every scheduled (task, delay)
/// - immediately reports TaskFinished with the decided outcome.
pub struct ImmediateTimers {
    tx: mpsc::Sender<SimEvent>,
    scheduled: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl ImmediateTimers {
    pub fn new(tx: mpsc::Sender<SimEvent>) -> Self {
        Self {
            tx,
            scheduled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn scheduled(&self) -> Arc<Mutex<Vec<(String, Duration)>>> {
        Arc::clone(&self.scheduled)
    }
}

impl TimerBackend for ImmediateTimers {
    fn schedule(
        &mut self,
        task: String,
        delay: Duration,
        outcome: TaskOutcome,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();
        let scheduled = Arc::clone(&self.scheduled);

        Box::pin(async move {
            scheduled.lock().unwrap().push((task.clone(), delay));
            tx.send(SimEvent::TaskFinished { task, outcome })
                .await
                .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}
