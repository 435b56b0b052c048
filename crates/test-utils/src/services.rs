use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dagfolio::services::CanvasServices;

/// Services that record everything the canvas asks of them.
#[derive(Debug, Clone, Default)]
pub struct RecordingServices {
    announcements: Arc<Mutex<Vec<String>>>,
    throttled: Arc<AtomicBool>,
    throttle_calls: Arc<AtomicUsize>,
    frames: Arc<AtomicUsize>,
}

impl RecordingServices {
    pub fn announcements(&self) -> Vec<String> {
        self.announcements.lock().unwrap().clone()
    }

    /// While set, every throttled action is refused.
    pub fn set_throttled(&self, throttled: bool) {
        self.throttled.store(throttled, Ordering::SeqCst);
    }

    pub fn throttle_calls(&self) -> usize {
        self.throttle_calls.load(Ordering::SeqCst)
    }

    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

impl CanvasServices for RecordingServices {
    fn announce(&self, message: &str) {
        self.announcements.lock().unwrap().push(message.to_string());
    }

    fn throttle(&self, _key: &str, _now: Instant) -> bool {
        self.throttle_calls.fetch_add(1, Ordering::SeqCst);
        !self.throttled.load(Ordering::SeqCst)
    }

    fn record_frame(&self, _elapsed: Duration) {
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}
