// src/canvas/frames.rs

//! Virtual-time frame scheduler.
//!
//! Stands in for `requestAnimationFrame` and `setTimeout`: work is queued as
//! [`FrameTask`] values and handed back by [`FrameScheduler::advance`] when
//! it is due. The canvas runs them in [`super::WorkflowCanvas::tick`].

use std::time::Duration;

use crate::types::NodeId;

/// Nominal frame length used when driving frames without a real clock.
pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTask {
    /// Redraw every connection; `attempt` counts layout-readiness retries.
    RedrawConnections { attempt: u32 },
    /// End a group's expand/collapse transition.
    FinishGroupTransition(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    now: Duration,
    next_frame: Vec<FrameTask>,
    timers: Vec<(Duration, FrameTask)>,
}

impl FrameScheduler {
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` on the next frame. A redraw already queued for the next
    /// frame absorbs another one.
    pub fn request_frame(&mut self, task: FrameTask) {
        if matches!(task, FrameTask::RedrawConnections { .. })
            && self
                .next_frame
                .iter()
                .any(|t| matches!(t, FrameTask::RedrawConnections { .. }))
        {
            return;
        }
        self.next_frame.push(task);
    }

    /// Run `task` once `delay` of virtual time has passed.
    pub fn schedule_after(&mut self, delay: Duration, task: FrameTask) {
        self.timers.push((self.now + delay, task));
    }

    pub fn has_pending(&self) -> bool {
        !self.next_frame.is_empty() || !self.timers.is_empty()
    }

    /// Advance virtual time and return the work due now: queued frame tasks
    /// first, then expired timers in due order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<FrameTask> {
        self.now += elapsed;
        let mut due: Vec<FrameTask> = std::mem::take(&mut self.next_frame);

        let now = self.now;
        let mut expired: Vec<(Duration, FrameTask)> = Vec::new();
        self.timers.retain(|(at, task)| {
            if *at <= now {
                expired.push((*at, task.clone()));
                false
            } else {
                true
            }
        });
        expired.sort_by_key(|(at, _)| *at);
        due.extend(expired.into_iter().map(|(_, task)| task));
        due
    }

    pub fn clear(&mut self) {
        self.next_frame.clear();
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_once_due() {
        let mut frames = FrameScheduler::default();
        frames.schedule_after(Duration::from_millis(50), FrameTask::FinishGroupTransition("g".into()));
        frames.request_frame(FrameTask::RedrawConnections { attempt: 0 });
        frames.request_frame(FrameTask::RedrawConnections { attempt: 3 });

        assert_eq!(frames.advance(FRAME), vec![FrameTask::RedrawConnections { attempt: 0 }]);
        assert!(frames.advance(FRAME).is_empty());
        assert_eq!(
            frames.advance(Duration::from_millis(20)),
            vec![FrameTask::FinishGroupTransition("g".into())]
        );
        assert!(!frames.has_pending());
    }
}
