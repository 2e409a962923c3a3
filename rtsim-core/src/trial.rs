use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal result of a trial as seen by the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Measured(Duration),
    MissedCollision,
}

/// Recorded result of one resolved trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial_id: usize,
    pub onset_delay_ns: u64,
    pub reaction_time_ns: Option<u64>,
    pub collided: bool,
    pub timestamp_ns: u64,
}
