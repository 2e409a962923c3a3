use std::time::Duration;

use rand::Rng;
use rtsim_core::{Aabb, Outcome, TrialPhase, TrialResult};
use rtsim_timing::Timer;

use crate::arbiter::{ResponseVerdict, on_response_signal};
use crate::config::{ConfigError, SimulationConfig};
use crate::controller::TrialController;
use crate::kinematics::Kinematics;
use crate::trial::Trial;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEvent {
    Armed { id: usize, onset_delay: Duration },
    Onset { at: u64 },
    Collided { at: u64 },
    Responded { reaction_time: Duration },
}

/// Drives one trial at a time. The presentation layer owns this, feeds it
/// ticks and response signals, and reads back phase, position and outcome.
pub struct ReactionTest<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub timer: T,
    pub rng: R,
    config: SimulationConfig,
    controller: TrialController,
    kinematics: Kinematics,
    trial: Trial,
}

impl<T, R> ReactionTest<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(config: SimulationConfig, timer: T, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = TrialController::new(&config);
        let kinematics = Kinematics::new(&config);
        let trial = Trial::idle(controller.start_x());
        Ok(Self {
            timer,
            rng,
            config,
            controller,
            kinematics,
            trial,
        })
    }

    pub fn arm(&mut self) -> TrialEvent {
        let now = self.timer.now();
        self.arm_at(now)
    }

    /// Starts a fresh trial, discarding whatever the previous one left behind.
    pub fn arm_at(&mut self, now: u64) -> TrialEvent {
        self.trial = self.controller.arm(&mut self.rng, now);
        TrialEvent::Armed {
            id: self.trial.id,
            onset_delay: self.trial.onset_delay,
        }
    }

    pub fn arm_with_delay(&mut self, now: u64, onset_delay: Duration) -> TrialEvent {
        self.trial = self.controller.arm_with_delay(now, onset_delay);
        TrialEvent::Armed {
            id: self.trial.id,
            onset_delay,
        }
    }

    pub fn tick_at(&mut self, now: u64) -> Option<TrialEvent> {
        self.controller.tick(&mut self.trial, now)
    }

    pub fn advance(&mut self) -> Option<TrialEvent> {
        let now = self.timer.now();
        self.advance_at(now)
    }

    pub fn advance_at(&mut self, now: u64) -> Option<TrialEvent> {
        let event = self.kinematics.advance(&mut self.trial, now);
        if event.is_some() {
            log::info!(
                "trial {}: collision, no response in time",
                self.trial.id
            );
        }
        event
    }

    pub fn step(&mut self) -> Vec<TrialEvent> {
        let now = self.timer.now();
        self.step_at(now)
    }

    /// Controller tick followed by a kinematics step. The onset tick itself
    /// already moves the opponent.
    pub fn step_at(&mut self, now: u64) -> Vec<TrialEvent> {
        let mut events = Vec::new();
        events.extend(self.tick_at(now));
        events.extend(self.advance_at(now));
        events
    }

    pub fn respond(&mut self) -> ResponseVerdict {
        let now = self.timer.now();
        self.respond_at(now)
    }

    pub fn respond_at(&mut self, now: u64) -> ResponseVerdict {
        let verdict = on_response_signal(&mut self.trial, now);
        match verdict {
            ResponseVerdict::Measured(rt) => log::info!(
                "trial {}: reaction time {:.3} s",
                self.trial.id,
                rt.as_secs_f64()
            ),
            ResponseVerdict::Ignored(reason) => {
                log::debug!("trial {}: response ignored ({:?})", self.trial.id, reason)
            }
        }
        verdict
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_phase(&self) -> TrialPhase {
        self.trial.phase
    }

    pub fn opponent_position(&self) -> f32 {
        self.trial.opponent_x
    }

    pub fn outcome(&self) -> Outcome {
        self.trial.outcome()
    }

    pub fn trial(&self) -> &Trial {
        &self.trial
    }

    pub fn result(&self) -> Option<TrialResult> {
        self.trial.result()
    }

    pub fn player_rect(&self) -> Aabb {
        self.kinematics.player
    }

    pub fn opponent_rect(&self) -> Aabb {
        self.kinematics.opponent_rect(&self.trial)
    }
}
