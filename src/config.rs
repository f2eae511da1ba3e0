//! Session configuration
//!
//! Tunable world parameters. Loaded from JSON by the host; any field missing
//! from the file keeps its default.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {value}")]
    Invalid { field: &'static str, value: f32 },
}

/// World and session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square play area
    pub world_size: f32,

    // === World generation ===
    /// Number of trees generated at session start
    pub tree_count: u32,
    /// Trees are scattered uniformly in a square of this side length
    pub tree_spread: f32,
    pub tree_scale_min: f32,
    pub tree_scale_max: f32,
    /// House location on the ground plane
    pub house_position: Vec2,

    // === Tornado ===
    /// Seconds between pursuit steps
    pub pursuit_interval_secs: f32,
    /// Distance covered per pursuit step
    pub pursuit_step: f32,
    /// Where the tornado first touches down
    pub tornado_start: Vec2,

    // === Session ===
    pub vehicle_start: Vec2,
    pub player_start: Vec2,
    pub starting_currency: u64,
    /// Hour of day at session start (night begins after 18:00)
    pub starting_hour: f32,
    /// In-game hours per real second
    pub hours_per_second: f32,

    // === Cosmetic ===
    /// Live debris cap across both kinds
    pub max_debris: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_size: 1500.0,

            tree_count: 2500,
            tree_spread: 1400.0,
            tree_scale_min: 3.0,
            tree_scale_max: 10.0,
            house_position: Vec2::ZERO,

            pursuit_interval_secs: 0.5,
            pursuit_step: 5.5,
            tornado_start: Vec2::new(600.0, 600.0),

            vehicle_start: Vec2::new(35.0, 35.0),
            player_start: Vec2::ZERO,
            starting_currency: 500,
            starting_hour: 20.0,
            hours_per_second: 0.3,

            max_debris: 2000,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_size", self.world_size),
            ("tree_spread", self.tree_spread),
            ("pursuit_interval_secs", self.pursuit_interval_secs),
            ("pursuit_step", self.pursuit_step),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }

        if !(self.tree_scale_min.is_finite() && self.tree_scale_min > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tree_scale_min",
                value: self.tree_scale_min,
            });
        }
        if !(self.tree_scale_max.is_finite() && self.tree_scale_max >= self.tree_scale_min) {
            return Err(ConfigError::Invalid {
                field: "tree_scale_max",
                value: self.tree_scale_max,
            });
        }
        if !(self.hours_per_second.is_finite() && self.hours_per_second >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "hours_per_second",
                value: self.hours_per_second,
            });
        }
        if !self.starting_hour.is_finite() {
            return Err(ConfigError::Invalid {
                field: "starting_hour",
                value: self.starting_hour,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "tree_count": 10, "pursuit_step": 2.0 }"#).unwrap();
        assert_eq!(config.tree_count, 10);
        assert_eq!(config.pursuit_step, 2.0);
        assert_eq!(config.world_size, 1500.0);
        assert_eq!(config.starting_currency, 500);
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let err = SimConfig::from_json(r#"{ "pursuit_interval_secs": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "pursuit_interval_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_scale_range() {
        let err =
            SimConfig::from_json(r#"{ "tree_scale_min": 5.0, "tree_scale_max": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tree_scale_max", .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
