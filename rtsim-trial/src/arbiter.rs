use std::time::Duration;

use rtsim_core::TrialPhase;

use crate::trial::Trial;

/// Why a response signal did not produce a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No trial has been armed yet.
    NotArmed,
    /// The opponent has not started moving.
    TooEarly,
    /// The opponent already hit the player.
    AfterCollision,
    /// A response was already counted for this trial.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseVerdict {
    Measured(Duration),
    Ignored(IgnoreReason),
}

impl ResponseVerdict {
    pub fn is_measured(&self) -> bool {
        matches!(self, ResponseVerdict::Measured(_))
    }
}

/// Turns a key press into a reaction time if, and only if, it lands after
/// onset and before impact. At most one response per trial counts.
pub fn on_response_signal(trial: &mut Trial, now: u64) -> ResponseVerdict {
    if !trial.phase.accepts_response() {
        return ResponseVerdict::Ignored(match trial.phase {
            TrialPhase::Idle => IgnoreReason::NotArmed,
            TrialPhase::Armed => IgnoreReason::TooEarly,
            _ if trial.collided => IgnoreReason::AfterCollision,
            _ => IgnoreReason::Duplicate,
        });
    }
    if trial.collided {
        return ResponseVerdict::Ignored(IgnoreReason::AfterCollision);
    }
    if trial.reaction_time.is_some() {
        return ResponseVerdict::Ignored(IgnoreReason::Duplicate);
    }
    let Some(triggered_at) = trial.timestamps.triggered_at else {
        return ResponseVerdict::Ignored(IgnoreReason::TooEarly);
    };

    let rt = Duration::from_nanos(now.saturating_sub(triggered_at));
    trial.reaction_time = Some(rt);
    trial.timestamps.responded_at = Some(now);
    trial.timestamps.resolved_at = Some(now);
    trial.phase = TrialPhase::Resolved;
    ResponseVerdict::Measured(rt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtsim_core::Outcome;

    const MS: u64 = 1_000_000;

    fn triggered_at(at: u64) -> Trial {
        let mut trial = Trial::armed(0, 0, Duration::from_nanos(at), 600.0);
        trial.phase = TrialPhase::Triggered;
        trial.timestamps.triggered_at = Some(at);
        trial
    }

    #[test]
    fn measures_time_since_onset() {
        let mut trial = triggered_at(3000 * MS);
        let verdict = on_response_signal(&mut trial, 3250 * MS);
        assert_eq!(verdict, ResponseVerdict::Measured(Duration::from_millis(250)));
        assert_eq!(trial.phase, TrialPhase::Resolved);
        assert_eq!(trial.outcome(), Outcome::Measured(Duration::from_millis(250)));
    }

    #[test]
    fn early_press_changes_nothing() {
        let mut trial = Trial::armed(0, 0, Duration::from_secs(3), 600.0);
        let before = trial.clone();
        assert_eq!(
            on_response_signal(&mut trial, 1000 * MS),
            ResponseVerdict::Ignored(IgnoreReason::TooEarly)
        );
        assert_eq!(trial, before);
    }

    #[test]
    fn press_before_arming_is_ignored() {
        let mut trial = Trial::idle(600.0);
        assert_eq!(
            on_response_signal(&mut trial, 0),
            ResponseVerdict::Ignored(IgnoreReason::NotArmed)
        );
    }

    #[test]
    fn second_press_is_a_duplicate() {
        let mut trial = triggered_at(0);
        assert!(on_response_signal(&mut trial, 200 * MS).is_measured());
        assert_eq!(
            on_response_signal(&mut trial, 210 * MS),
            ResponseVerdict::Ignored(IgnoreReason::Duplicate)
        );
        assert_eq!(trial.reaction_time, Some(Duration::from_millis(200)));
    }

    #[test]
    fn press_after_collision_is_too_late() {
        let mut trial = triggered_at(0);
        trial.collided = true;
        trial.phase = TrialPhase::Resolved;
        assert_eq!(
            on_response_signal(&mut trial, 900 * MS),
            ResponseVerdict::Ignored(IgnoreReason::AfterCollision)
        );
        assert_eq!(trial.reaction_time, None);
        assert_eq!(trial.outcome(), Outcome::MissedCollision);
    }
}
