use rtsim_core::{Aabb, TrialPhase};

use crate::config::SimulationConfig;
use crate::state::TrialEvent;
use crate::trial::Trial;

/// Moves the opposing car toward the player and detects the impact.
#[derive(Debug, Clone)]
pub struct Kinematics {
    pub player: Aabb,
    /// Opponent rectangle at its start position; only `x` changes over a trial.
    pub opponent: Aabb,
    pub drift_speed: f32,
}

impl Kinematics {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            player: config.player,
            opponent: config.opponent,
            drift_speed: config.drift_speed,
        }
    }

    pub fn opponent_rect(&self, trial: &Trial) -> Aabb {
        self.opponent.with_x(trial.opponent_x)
    }

    pub fn check_collision(&self, trial: &Trial) -> bool {
        self.opponent_rect(trial).overlaps(&self.player)
    }

    /// One drift step followed by a collision check. Impact is terminal: the
    /// trial resolves and the opponent stays where it hit.
    ///
    /// Overlap is only sampled after each step, so a step wider than both cars
    /// together can carry the opponent through the player unnoticed.
    pub fn advance(&self, trial: &mut Trial, now: u64) -> Option<TrialEvent> {
        if !trial.is_drifting() {
            return None;
        }
        trial.opponent_x -= self.drift_speed;
        if !self.check_collision(trial) {
            return None;
        }
        trial.collided = true;
        trial.phase = TrialPhase::Resolved;
        trial.timestamps.resolved_at = Some(now);
        log::debug!(
            "trial {} collided at x={} ({} ns)",
            trial.id,
            trial.opponent_x,
            now
        );
        Some(TrialEvent::Collided { at: now })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn triggered(kinematics: &Kinematics) -> Trial {
        let mut trial = Trial::armed(0, 0, Duration::from_secs(2), kinematics.opponent.x);
        trial.phase = TrialPhase::Triggered;
        trial.timestamps.triggered_at = Some(0);
        trial
    }

    #[test]
    fn collision_registers_on_first_positive_overlap() {
        let kinematics = Kinematics::new(&SimulationConfig::default());
        let mut trial = triggered(&kinematics);

        let mut steps = 0;
        while kinematics.advance(&mut trial, steps).is_none() {
            steps += 1;
            assert!(steps < 1000, "opponent never reached the player");
        }
        // 600 -> 250 touches the player's right edge without overlap, 245 overlaps
        assert_eq!(steps + 1, 71);
        assert_eq!(trial.opponent_x, 245.0);
        assert!(trial.collided);
        assert_eq!(trial.phase, TrialPhase::Resolved);
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let kinematics = Kinematics::new(&SimulationConfig::default());
        let mut trial = triggered(&kinematics);
        trial.opponent_x = 250.0;
        assert!(!kinematics.check_collision(&trial));
        trial.opponent_x = 249.5;
        assert!(kinematics.check_collision(&trial));
    }

    #[test]
    fn armed_opponent_does_not_move() {
        let kinematics = Kinematics::new(&SimulationConfig::default());
        let mut trial = Trial::armed(0, 0, Duration::from_secs(2), 600.0);
        assert_eq!(kinematics.advance(&mut trial, 1), None);
        assert_eq!(trial.opponent_x, 600.0);
    }

    #[test]
    fn oversized_step_tunnels_through() {
        let config = SimulationConfig {
            drift_speed: 400.0,
            ..SimulationConfig::default()
        };
        let kinematics = Kinematics::new(&config);
        let mut trial = triggered(&kinematics);
        // 600 -> 200 overlaps exactly, so start further right to skip the window
        trial.opponent_x = 700.0;
        assert_eq!(kinematics.advance(&mut trial, 1), None);
        assert_eq!(trial.opponent_x, 300.0);
        assert_eq!(kinematics.advance(&mut trial, 2), None);
        assert_eq!(trial.opponent_x, -100.0);
        assert!(!trial.collided);
    }

    proptest! {
        #[test]
        fn impact_is_terminal_and_frozen(speed in 0.5f32..99.0) {
            let config = SimulationConfig { drift_speed: speed, ..SimulationConfig::default() };
            let kinematics = Kinematics::new(&config);
            let mut trial = triggered(&kinematics);

            let mut now = 0;
            while kinematics.advance(&mut trial, now).is_none() {
                now += 1;
                prop_assert!(now < 10_000);
            }
            let frozen_at = trial.opponent_x;
            prop_assert!(kinematics.check_collision(&trial));
            for later in now + 1..now + 20 {
                prop_assert_eq!(kinematics.advance(&mut trial, later), None);
                prop_assert!(trial.collided);
                prop_assert_eq!(trial.opponent_x, frozen_at);
            }
        }
    }
}
