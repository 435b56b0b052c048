// src/services/perf.rs

//! Frame timing and throttling.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Budget of one frame at 60 fps.
pub const FRAME_BUDGET: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub frames: u64,
    pub slow_frames: u64,
    pub average: Duration,
    pub worst: Duration,
}

/// Running statistics over recorded frame durations.
#[derive(Debug, Clone, Default)]
pub struct PerformanceMonitor {
    frames: u64,
    slow_frames: u64,
    total: Duration,
    worst: Duration,
}

impl PerformanceMonitor {
    pub fn record(&mut self, elapsed: Duration) {
        self.frames += 1;
        self.total += elapsed;
        self.worst = self.worst.max(elapsed);
        if elapsed > FRAME_BUDGET {
            self.slow_frames += 1;
        }
    }

    pub fn stats(&self) -> FrameStats {
        let average = if self.frames == 0 {
            Duration::ZERO
        } else {
            self.total / self.frames as u32
        };
        FrameStats {
            frames: self.frames,
            slow_frames: self.slow_frames,
            average,
            worst: self.worst,
        }
    }
}

/// Per-key minimum interval between runs.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_run: HashMap<String, Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: HashMap::new(),
        }
    }

    /// `true` (and the run is recorded) if `key` last ran at least
    /// `interval` before `now`, or never ran.
    pub fn should_run(&mut self, key: &str, now: Instant) -> bool {
        match self.last_run.get(key) {
            Some(last) if now.saturating_duration_since(*last) < self.interval => false,
            _ => {
                self.last_run.insert(key.to_string(), now);
                true
            }
        }
    }
}
