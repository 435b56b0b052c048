// src/services/mod.rs

//! Support services injected into the canvas.
//!
//! The canvas only needs three operations from its surroundings, collected in
//! [`CanvasServices`]: announce a message to assistive technology, ask whether
//! a throttled action may run now, and report frame timings.
//!
//! - [`a11y`] holds the live region and the modal focus trap.
//! - [`perf`] holds the frame monitor and the per-key throttle.

pub mod a11y;
pub mod perf;

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub use a11y::{FocusTrap, LiveRegion, Politeness};
pub use perf::{FrameStats, PerformanceMonitor, Throttle};

/// Operations the canvas needs from the page.
pub trait CanvasServices: Send + Sync + Debug {
    /// Queue a message for screen readers.
    fn announce(&self, message: &str);

    /// `true` if the action identified by `key` may run at `now`.
    fn throttle(&self, key: &str, now: Instant) -> bool;

    /// Record how long one frame of canvas work took.
    fn record_frame(&self, elapsed: Duration);
}

/// Services that do nothing; every throttled action is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopServices;

impl CanvasServices for NoopServices {
    fn announce(&self, _message: &str) {}

    fn throttle(&self, _key: &str, _now: Instant) -> bool {
        true
    }

    fn record_frame(&self, _elapsed: Duration) {}
}

/// Production services owned by the page bootstrap.
#[derive(Debug, Clone)]
pub struct PageServices {
    live_region: Arc<Mutex<LiveRegion>>,
    monitor: Arc<Mutex<PerformanceMonitor>>,
    throttle: Arc<Mutex<Throttle>>,
}

/// Minimum interval between two throttled canvas actions of the same kind
/// (roughly one per frame).
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(16);

impl Default for PageServices {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}

impl PageServices {
    pub fn new(throttle_interval: Duration) -> Self {
        Self {
            live_region: Arc::new(Mutex::new(LiveRegion::default())),
            monitor: Arc::new(Mutex::new(PerformanceMonitor::default())),
            throttle: Arc::new(Mutex::new(Throttle::new(throttle_interval))),
        }
    }

    /// Announcements made so far, oldest first.
    pub fn announcements(&self) -> Vec<String> {
        match self.live_region.lock() {
            Ok(region) => region.messages().to_vec(),
            Err(poisoned) => poisoned.into_inner().messages().to_vec(),
        }
    }

    pub fn frame_stats(&self) -> FrameStats {
        match self.monitor.lock() {
            Ok(monitor) => monitor.stats(),
            Err(poisoned) => poisoned.into_inner().stats(),
        }
    }
}

impl CanvasServices for PageServices {
    fn announce(&self, message: &str) {
        if let Ok(mut region) = self.live_region.lock() {
            region.push(message, Politeness::Polite);
        }
    }

    fn throttle(&self, key: &str, now: Instant) -> bool {
        match self.throttle.lock() {
            Ok(mut throttle) => throttle.should_run(key, now),
            Err(_) => true,
        }
    }

    fn record_frame(&self, elapsed: Duration) {
        if let Ok(mut monitor) = self.monitor.lock() {
            monitor.record(elapsed);
        }
    }
}
