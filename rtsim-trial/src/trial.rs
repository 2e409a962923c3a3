use std::time::Duration;

use rtsim_core::{Outcome, TrialPhase, TrialResult};

/// The single mutable attempt shared by the controller, the kinematics model
/// and the input arbiter.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub id: usize,
    pub phase: TrialPhase,
    pub onset_delay: Duration,
    pub timestamps: TrialTimestamps,
    pub opponent_x: f32,
    pub collided: bool,
    pub reaction_time: Option<Duration>,
}

/// Nanosecond timestamps on the injected timer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialTimestamps {
    pub armed_at: u64,
    pub triggered_at: Option<u64>,
    pub responded_at: Option<u64>,
    pub resolved_at: Option<u64>,
}

impl Trial {
    /// Placeholder before the first arm.
    pub fn idle(start_x: f32) -> Self {
        Self {
            id: 0,
            phase: TrialPhase::Idle,
            onset_delay: Duration::ZERO,
            timestamps: TrialTimestamps::default(),
            opponent_x: start_x,
            collided: false,
            reaction_time: None,
        }
    }

    pub fn armed(id: usize, now: u64, onset_delay: Duration, start_x: f32) -> Self {
        Self {
            id,
            phase: TrialPhase::Armed,
            onset_delay,
            timestamps: TrialTimestamps {
                armed_at: now,
                ..TrialTimestamps::default()
            },
            opponent_x: start_x,
            collided: false,
            reaction_time: None,
        }
    }

    pub fn onset_due(&self, now: u64) -> bool {
        self.phase == TrialPhase::Armed
            && now.saturating_sub(self.timestamps.armed_at) >= self.onset_delay.as_nanos() as u64
    }

    /// Opponent moves only between onset and impact.
    pub fn is_drifting(&self) -> bool {
        self.phase == TrialPhase::Triggered && !self.collided
    }

    pub fn outcome(&self) -> Outcome {
        if self.phase != TrialPhase::Resolved {
            return Outcome::Pending;
        }
        match self.reaction_time {
            Some(rt) => Outcome::Measured(rt),
            None if self.collided => Outcome::MissedCollision,
            None => Outcome::Pending,
        }
    }

    /// Snapshot for logging once the trial is resolved.
    pub fn result(&self) -> Option<TrialResult> {
        if !self.phase.is_resolved() {
            return None;
        }
        Some(TrialResult {
            trial_id: self.id,
            onset_delay_ns: self.onset_delay.as_nanos() as u64,
            reaction_time_ns: self.reaction_time.map(|rt| rt.as_nanos() as u64),
            collided: self.collided,
            timestamp_ns: self.timestamps.resolved_at.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_trial_is_pending_and_never_due() {
        let trial = Trial::idle(600.0);
        assert_eq!(trial.outcome(), Outcome::Pending);
        assert!(!trial.onset_due(u64::MAX));
        assert!(trial.result().is_none());
    }

    #[test]
    fn onset_is_due_at_exactly_the_delay() {
        let trial = Trial::armed(1, 1_000, Duration::from_secs(3), 600.0);
        assert!(!trial.onset_due(1_000 + 2_999_999_999));
        assert!(trial.onset_due(1_000 + 3_000_000_000));
    }

    #[test]
    fn unresolved_reaction_is_still_pending() {
        let mut trial = Trial::armed(1, 0, Duration::from_secs(2), 600.0);
        trial.phase = TrialPhase::Triggered;
        trial.reaction_time = Some(Duration::from_millis(200));
        assert_eq!(trial.outcome(), Outcome::Pending);
        trial.phase = TrialPhase::Resolved;
        assert_eq!(
            trial.outcome(),
            Outcome::Measured(Duration::from_millis(200))
        );
    }
}
