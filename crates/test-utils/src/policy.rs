use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dagfolio::engine::{Decision, OutcomePolicy, TaskOutcome};
use dagfolio::model::Task;

/// Deterministic policy: fixed decisions per task id, a default otherwise.
/// Records the order in which tasks were decided.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    decisions: HashMap<String, Decision>,
    default: Decision,
    decided: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPolicy {
    pub fn succeed_all(delay: Duration) -> Self {
        Self {
            decisions: HashMap::new(),
            default: Decision {
                delay,
                outcome: TaskOutcome::Success,
            },
            decided: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fail(mut self, task: &str) -> Self {
        self.decisions.insert(
            task.to_string(),
            Decision {
                delay: self.default.delay,
                outcome: TaskOutcome::Failed,
            },
        );
        self
    }

    pub fn with(mut self, task: &str, decision: Decision) -> Self {
        self.decisions.insert(task.to_string(), decision);
        self
    }

    /// Shared log of decided task ids.
    pub fn decided(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.decided)
    }
}

impl OutcomePolicy for ScriptedPolicy {
    fn decide(&mut self, task: &Task) -> Decision {
        self.decided.lock().unwrap().push(task.id.clone());
        self.decisions.get(&task.id).copied().unwrap_or(self.default)
    }
}
