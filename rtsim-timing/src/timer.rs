use std::time::{Duration, Instant};

/// Monotonic time source injected into the simulation.
///
/// Timestamps are nanoseconds since the timer was created. Implementations
/// must never go backwards.
pub trait Timer: Clone + Send + Sync {
    type Timestamp: Copy + Clone + Send + Sync;
    fn now(&self) -> Self::Timestamp;
    fn elapsed(&self, ts: Self::Timestamp) -> Duration;
    fn record_frame(&mut self, d: Duration);
    fn frame_count(&self) -> usize;
    fn calibration_stats(&self) -> CalibrationStats;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationStats {
    pub average_frame_time_ns: f64,
    pub jitter_ns: f64,
    pub min_frame_time_ns: f64,
    pub max_frame_time_ns: f64,
    pub effective_fps: f64,
}

impl CalibrationStats {
    /// Summarises a window of frame durations. Jitter is the population
    /// standard deviation.
    pub fn from_frames(frames: &[Duration]) -> Self {
        if frames.is_empty() {
            return CalibrationStats::default();
        }
        let times: Vec<f64> = frames.iter().map(|d| d.as_nanos() as f64).collect();
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / times.len() as f64;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        CalibrationStats {
            average_frame_time_ns: avg,
            jitter_ns: var.sqrt(),
            min_frame_time_ns: min,
            max_frame_time_ns: max,
            effective_fps: if avg > 0.0 { 1e9 / avg } else { 0.0 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
    pub frame_times: Vec<Duration>,
    pub max_samples: usize,
}

impl Timer for HighPrecisionTimer {
    type Timestamp = u64;
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn record_frame(&mut self, d: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.remove(0);
        }
        self.frame_times.push(d);
    }
    fn frame_count(&self) -> usize {
        self.frame_times.len()
    }
    fn calibration_stats(&self) -> CalibrationStats {
        CalibrationStats::from_frames(&self.frame_times)
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        log::debug!("timer started, keeping {} frame samples", max_samples);
        Self {
            start: Instant::now(),
            frame_times: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    /// Converts an `Instant` taken elsewhere (e.g. when an input event
    /// arrived) into this timer's timestamp space.
    pub fn timestamp_of(&self, instant: Instant) -> u64 {
        instant.saturating_duration_since(self.start).as_nanos() as u64
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_monotonic() {
        let timer = HighPrecisionTimer::new();
        let a = timer.now();
        let b = timer.now();
        assert!(b >= a);
        assert!(timer.elapsed(b + 1_000_000_000) == Duration::ZERO);
    }

    #[test]
    fn frame_window_is_bounded() {
        let mut timer = HighPrecisionTimer::with_capacity(3);
        for ms in 1..=5 {
            timer.record_frame(Duration::from_millis(ms));
        }
        assert_eq!(timer.frame_count(), 3);
        assert_eq!(timer.frame_times[0], Duration::from_millis(3));
    }

    #[test]
    fn stats_of_steady_frames() {
        let frames = vec![Duration::from_millis(16); 10];
        let stats = CalibrationStats::from_frames(&frames);
        assert_eq!(stats.jitter_ns, 0.0);
        assert_eq!(stats.min_frame_time_ns, 16_000_000.0);
        assert_eq!(stats.max_frame_time_ns, 16_000_000.0);
        assert!((stats.effective_fps - 62.5).abs() < 1e-9);
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        assert_eq!(CalibrationStats::from_frames(&[]), CalibrationStats::default());
    }

    #[test]
    fn instants_map_into_timestamp_space() {
        let timer = HighPrecisionTimer::new();
        let later = timer.start + Duration::from_millis(5);
        assert_eq!(timer.timestamp_of(later), 5_000_000);
        assert_eq!(timer.timestamp_of(timer.start), 0);
    }
}
