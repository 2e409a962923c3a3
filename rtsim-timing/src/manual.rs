use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::timer::{CalibrationStats, Timer};

/// Timer driven by hand. Clones share the same clock, so a test can keep a
/// handle while the simulation owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now_ns: Arc<AtomicU64>,
    frames: Vec<Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ns: u64) {
        self.now_ns.store(ns, Ordering::SeqCst);
    }

    pub fn set_secs(&self, secs: f64) {
        self.set(Duration::from_secs_f64(secs).as_nanos() as u64);
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Timer for ManualTimer {
    type Timestamp = u64;
    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn record_frame(&mut self, d: Duration) {
        self.frames.push(d);
    }
    fn frame_count(&self) -> usize {
        self.frames.len()
    }
    fn calibration_stats(&self) -> CalibrationStats {
        CalibrationStats::from_frames(&self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let handle = ManualTimer::new();
        let owned = handle.clone();
        handle.set_secs(2.5);
        assert_eq!(owned.now(), 2_500_000_000);
        handle.advance(Duration::from_millis(250));
        assert_eq!(owned.now(), 2_750_000_000);
        assert_eq!(owned.elapsed(2_000_000_000), Duration::from_millis(750));
    }
}
