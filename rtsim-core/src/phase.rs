use serde::{Deserialize, Serialize};

/// Lifecycle of a single trial
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialPhase {
    Idle,
    Armed,
    Triggered,
    Resolved,
}

impl Default for TrialPhase {
    fn default() -> Self {
        TrialPhase::Idle
    }
}

impl TrialPhase {
    /// Only a triggered trial can turn a key press into a measurement.
    pub fn accepts_response(&self) -> bool {
        matches!(self, Self::Triggered)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Screen the presentation layer shows for a given phase
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Simulation,
    Result,
}

impl Screen {
    pub fn from_phase(phase: TrialPhase) -> Self {
        use TrialPhase::*;
        match phase {
            Idle => Screen::Menu,
            Armed | Triggered => Screen::Simulation,
            Resolved => Screen::Result,
        }
    }
}

impl From<TrialPhase> for Screen {
    fn from(phase: TrialPhase) -> Self {
        Screen::from_phase(phase)
    }
}
