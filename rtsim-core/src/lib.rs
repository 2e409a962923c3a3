pub mod geometry;
pub mod phase;
pub mod trial;

pub use geometry::Aabb;
pub use phase::{Screen, TrialPhase};
pub use trial::{Outcome, TrialResult};
