use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rtsim_core::Aabb;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Onset delay is drawn uniformly from `[lo, hi)` seconds.
    pub onset_delay_range_s: (f64, f64),
    pub arena_width: u32,
    pub arena_height: u32,
    /// Stationary car.
    pub player: Aabb,
    /// Opposing car at its start position.
    pub opponent: Aabb,
    /// Pixels per tick once the onset has fired.
    pub drift_speed: f32,
    pub tick_rate_hz: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let (width, height) = (800, 600);
        let car_y = (height / 2 - 80 / 2) as f32;
        Self {
            onset_delay_range_s: (2.0, 5.0),
            arena_width: width,
            arena_height: height,
            player: Aabb::new(200.0, car_y, 50.0, 80.0),
            opponent: Aabb::new(600.0, car_y, 50.0, 80.0),
            drift_speed: 5.0,
            tick_rate_hz: 60,
            font_path: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("loading simulation config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.onset_delay_range_s;
        if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo >= hi {
            return Err(ConfigError::Invalid(format!(
                "onset delay range [{lo}, {hi}) must be finite, non-negative and non-empty"
            )));
        }
        let (lo_d, hi_d) = self.onset_delay_bounds();
        if lo_d >= hi_d {
            return Err(ConfigError::Invalid(format!(
                "onset delay range [{lo}, {hi}) is narrower than a nanosecond"
            )));
        }
        if self.arena_width == 0 || self.arena_height == 0 {
            return Err(ConfigError::Invalid("arena must have a non-zero size".into()));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick rate must be positive".into()));
        }
        if !(self.drift_speed.is_finite() && self.drift_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "drift speed {} must be positive",
                self.drift_speed
            )));
        }
        let (w, h) = (self.arena_width as f32, self.arena_height as f32);
        for (name, rect) in [("player", &self.player), ("opponent", &self.opponent)] {
            if rect.width <= 0.0 || rect.height <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} car has no area")));
            }
            if !rect.fits_within(w, h) {
                return Err(ConfigError::Invalid(format!(
                    "{name} car {rect:?} lies outside the {w}x{h} arena"
                )));
            }
        }
        if self.opponent.x < self.player.right() {
            return Err(ConfigError::Invalid(
                "opponent must start to the right of the player".into(),
            ));
        }

        // Collision is sampled once per tick; a step wider than the overlap
        // window lets the opponent pass straight through the player.
        let window = self.player.width + self.opponent.width;
        if self.drift_speed >= window {
            log::warn!(
                "drift speed {} px/tick >= overlap window {} px, collisions may be missed",
                self.drift_speed,
                window
            );
        }
        Ok(())
    }

    pub fn onset_delay_bounds(&self) -> (Duration, Duration) {
        let (lo, hi) = self.onset_delay_range_s;
        (Duration::from_secs_f64(lo), Duration::from_secs_f64(hi))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_layout() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player, Aabb::new(200.0, 260.0, 50.0, 80.0));
        assert_eq!(config.opponent.x, 600.0);
        assert_eq!(config.opponent.y, 260.0);
        assert_eq!(config.drift_speed, 5.0);
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            SimulationConfig::from_json_str(r#"{ "drift_speed": 8.0, "tick_rate_hz": 120 }"#)
                .unwrap();
        assert_eq!(config.drift_speed, 8.0);
        assert_eq!(config.tick_rate_hz, 120);
        assert_eq!(config.onset_delay_range_s, (2.0, 5.0));
    }

    #[test]
    fn empty_delay_range_is_rejected() {
        let err = SimulationConfig::from_json_str(r#"{ "onset_delay_range_s": [3.0, 3.0] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn sub_nanosecond_delay_range_is_rejected() {
        let config = SimulationConfig {
            onset_delay_range_s: (2.0, 2.0 + 1e-12),
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SimulationConfig::from_json_str("{ drift_speed: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn opponent_left_of_player_is_rejected() {
        let config = SimulationConfig {
            opponent: Aabb::new(100.0, 260.0, 50.0, 80.0),
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimulationConfig::from_json_file("/nonexistent/rtsim.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
