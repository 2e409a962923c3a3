use std::time::Duration;

use rand::Rng;
use rtsim_core::TrialPhase;

use crate::config::SimulationConfig;
use crate::state::TrialEvent;
use crate::trial::Trial;

/// Owns the trial lifecycle: arming with a random onset delay and the
/// time-driven Armed -> Triggered transition.
#[derive(Debug, Clone)]
pub struct TrialController {
    delay_range_ns: (u64, u64),
    start_x: f32,
    next_id: usize,
}

impl TrialController {
    pub fn new(config: &SimulationConfig) -> Self {
        let (lo, hi) = config.onset_delay_bounds();
        Self {
            delay_range_ns: (lo.as_nanos() as u64, hi.as_nanos() as u64),
            start_x: config.opponent.x,
            next_id: 0,
        }
    }

    pub fn start_x(&self) -> f32 {
        self.start_x
    }

    /// Samples a delay uniformly from the configured half-open range, in
    /// whole nanoseconds so the upper bound is never reached.
    pub fn sample_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let (lo, hi) = self.delay_range_ns;
        Duration::from_nanos(rng.random_range(lo..hi))
    }

    pub fn arm<R: Rng>(&mut self, rng: &mut R, now: u64) -> Trial {
        let delay = self.sample_delay(rng);
        self.arm_with_delay(now, delay)
    }

    /// Builds a fresh trial. Nothing from the previous trial carries over.
    pub fn arm_with_delay(&mut self, now: u64, onset_delay: Duration) -> Trial {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!(
            "trial {} armed at {} ns, onset in {:.3} s",
            id,
            now,
            onset_delay.as_secs_f64()
        );
        Trial::armed(id, now, onset_delay, self.start_x)
    }

    /// Fires the onset once the delay has elapsed. Repeated calls after the
    /// transition are no-ops because the phase has moved on.
    pub fn tick(&self, trial: &mut Trial, now: u64) -> Option<TrialEvent> {
        if !trial.onset_due(now) {
            return None;
        }
        trial.phase = TrialPhase::Triggered;
        trial.timestamps.triggered_at = Some(now);
        log::debug!("trial {} onset at {} ns", trial.id, now);
        Some(TrialEvent::Onset { at: now })
    }
}
