// src/engine/policy.rs

//! Delay and outcome policies for simulated tasks.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::model::SimulationSettings;
use crate::engine::TaskOutcome;
use crate::model::Task;

/// How long a task "runs" and how it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub delay: Duration,
    pub outcome: TaskOutcome,
}

/// Chooses a [`Decision`] per task.
///
/// Production uses [`RandomPolicy`]; tests supply fixed decisions.
pub trait OutcomePolicy: Send {
    fn decide(&mut self, task: &Task) -> Decision;
}

/// Uniform delay in `[min_delay, max_delay]`, failure with probability
/// `failure_rate`.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
    min_delay: Duration,
    max_delay: Duration,
    failure_rate: f64,
}

impl RandomPolicy {
    /// Seeded from `settings.seed` when present, from OS entropy otherwise.
    pub fn from_settings(settings: &SimulationSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let min = settings.min_delay_ms.min(settings.max_delay_ms);
        let max = settings.min_delay_ms.max(settings.max_delay_ms);
        Self {
            rng,
            min_delay: Duration::from_millis(min),
            max_delay: Duration::from_millis(max),
            failure_rate: settings.failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn with_seed(settings: &SimulationSettings, seed: u64) -> Self {
        let mut policy = Self::from_settings(settings);
        policy.rng = StdRng::seed_from_u64(seed);
        policy
    }
}

impl OutcomePolicy for RandomPolicy {
    fn decide(&mut self, _task: &Task) -> Decision {
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        let delay = Duration::from_millis(self.rng.gen_range(min..=max));
        let outcome = if self.rng.gen_bool(self.failure_rate) {
            TaskOutcome::Failed
        } else {
            TaskOutcome::Success
        };
        Decision { delay, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(failure_rate: f64) -> SimulationSettings {
        SimulationSettings {
            min_delay_ms: 100,
            max_delay_ms: 300,
            failure_rate,
            seed: Some(7),
        }
    }

    #[test]
    fn delays_stay_in_range() {
        let mut policy = RandomPolicy::from_settings(&settings(0.5));
        let task = Task::new("t", "T");
        for _ in 0..200 {
            let d = policy.decide(&task);
            assert!(d.delay >= Duration::from_millis(100));
            assert!(d.delay <= Duration::from_millis(300));
        }
    }

    #[test]
    fn zero_failure_rate_always_succeeds() {
        let mut policy = RandomPolicy::from_settings(&settings(0.0));
        let task = Task::new("t", "T");
        assert!((0..100).all(|_| policy.decide(&task).outcome == TaskOutcome::Success));
    }

    #[test]
    fn same_seed_same_decisions() {
        let task = Task::new("t", "T");
        let mut a = RandomPolicy::with_seed(&settings(0.3), 42);
        let mut b = RandomPolicy::with_seed(&settings(0.3), 42);
        for _ in 0..20 {
            assert_eq!(a.decide(&task), b.decide(&task));
        }
    }
}
