pub mod arbiter;
pub mod config;
pub mod controller;
pub mod kinematics;
pub mod state;
pub mod trial;

pub use arbiter::{IgnoreReason, ResponseVerdict, on_response_signal};
pub use config::{ConfigError, SimulationConfig};
pub use controller::TrialController;
pub use kinematics::Kinematics;
pub use state::{ReactionTest, TrialEvent};
pub use trial::{Trial, TrialTimestamps};
