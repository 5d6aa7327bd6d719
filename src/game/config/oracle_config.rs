//! Oracle Configuration
//!
//! Central configuration for the coin scene, the toss and the settle
//! timer. `Default` returns the constants of the browser toy; a JSON
//! file may override any subset of fields.

use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::game::classifier::Classifier;
use crate::game::error::OracleError;
use crate::game::hexagram::{HexagramEntry, HexagramTable};
use crate::physics::{CoinShape, PhysicsConfig};

/// Layout and physical properties of the three coins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinConfig {
    pub shape: CoinShape,
    /// Mass of each coin (kg)
    pub mass: f32,
    /// Distance between neighbouring coin slots along X (meters)
    pub spacing: f32,
    /// Drop height of the first coin (meters)
    pub base_height: f32,
    /// Extra drop height per coin index (meters)
    pub height_step: f32,
    /// Axis of the face-up base rotation
    pub base_axis: Vec3,
    /// Angle of the face-up base rotation (radians)
    pub base_angle: f32,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            shape: CoinShape::default(),
            mass: 1.0,
            spacing: 5.0,
            base_height: 10.0,
            height_step: 2.0,
            base_axis: Vec3::X,
            base_angle: 0.0,
        }
    }
}

impl CoinConfig {
    /// Resting slot of coin `index` (before jitter).
    pub fn slot(&self, index: usize) -> Vec3 {
        Vec3::new(
            (index as f32 - 1.0) * self.spacing,
            self.base_height + index as f32 * self.height_step,
            0.0,
        )
    }

    /// Rotation that lays a coin face-up in its slot.
    pub fn base_rotation(&self) -> Quat {
        Quat::from_axis_angle(self.base_axis.normalize_or(Vec3::X), self.base_angle)
    }
}

/// Randomization ranges applied on every toss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TossConfig {
    /// Full width of the X/Z position jitter around the slot (meters)
    pub position_jitter: f32,
    /// Full width of the lateral (X/Z) impulse range (N·s)
    pub lateral_impulse: f32,
    /// Minimum upward impulse (N·s)
    pub upward_impulse_min: f32,
    /// Random extra upward impulse on top of the minimum (N·s)
    pub upward_impulse_range: f32,
    /// Full width of each angular velocity component range (rad/s)
    pub spin: f32,
}

impl Default for TossConfig {
    fn default() -> Self {
        Self {
            position_jitter: 2.0,
            lateral_impulse: 5.0,
            upward_impulse_min: 5.0,
            upward_impulse_range: 5.0,
            spin: 10.0,
        }
    }
}

/// How the end of the settling period is detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleMode {
    /// Resolve a fixed wall-clock delay after the toss.
    #[default]
    FixedDelay,
    /// Resolve once every coin has been slow for a while, capped by `max_settle`.
    VelocityThreshold,
}

impl std::str::FromStr for SettleMode {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fixed_delay" => Ok(SettleMode::FixedDelay),
            "velocity" | "velocity_threshold" => Ok(SettleMode::VelocityThreshold),
            other => Err(OracleError::InvalidArgument(format!(
                "unknown settle mode '{other}' (expected fixed or velocity)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    pub mode: SettleMode,
    /// Delay used by `FixedDelay` (seconds)
    pub delay: f32,
    /// Linear speed under which a coin counts as still (m/s)
    pub linear_epsilon: f32,
    /// Angular speed under which a coin counts as still (rad/s)
    pub angular_epsilon: f32,
    /// How long every coin must stay still (seconds)
    pub rest_hold: f32,
    /// Upper bound for `VelocityThreshold` (seconds)
    pub max_settle: f32,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            mode: SettleMode::default(),
            delay: 5.0,
            linear_epsilon: 0.05,
            angular_epsilon: 0.05,
            rest_hold: 0.5,
            max_settle: 10.0,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub physics: PhysicsConfig,
    pub coins: CoinConfig,
    pub toss: TossConfig,
    pub settle: SettleConfig,
    pub classifier: Classifier,
    /// Replaces the built-in hexagram table when present
    pub hexagrams: Option<Vec<HexagramEntry>>,
    /// Fixed RNG seed for reproducible tosses
    pub seed: Option<u64>,
}

impl OracleConfig {
    /// Load a JSON configuration file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, OracleError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, OracleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), OracleError> {
        // Contact parameters are checked by the engine factory, which
        // substitutes the fallback stepper instead of failing.
        self.physics.validate()?;

        let coins = &self.coins;
        if !(coins.shape.radius > 0.0 && coins.shape.height > 0.0) {
            return Err(OracleError::InvalidConfig(
                "coin radius and height must be positive".to_string(),
            ));
        }
        if !(coins.mass > 0.0) {
            return Err(OracleError::InvalidConfig(format!(
                "coin mass must be positive, got {}",
                coins.mass
            )));
        }
        if !coins.base_angle.is_finite() || !coins.base_axis.is_finite() {
            return Err(OracleError::InvalidConfig(
                "coin base rotation must be finite".to_string(),
            ));
        }

        let toss = &self.toss;
        let ranges = [
            toss.position_jitter,
            toss.lateral_impulse,
            toss.upward_impulse_min,
            toss.upward_impulse_range,
            toss.spin,
        ];
        if ranges.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
            return Err(OracleError::InvalidConfig(
                "toss ranges must be finite and non-negative".to_string(),
            ));
        }

        let settle = &self.settle;
        if !(settle.delay > 0.0 && settle.max_settle > 0.0) {
            return Err(OracleError::InvalidConfig(
                "settle delay and max_settle must be positive".to_string(),
            ));
        }
        if settle.linear_epsilon <= 0.0 || settle.angular_epsilon <= 0.0 || settle.rest_hold < 0.0
        {
            return Err(OracleError::InvalidConfig(
                "settle epsilons must be positive and rest_hold non-negative".to_string(),
            ));
        }

        let threshold = self.classifier.flat_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(OracleError::InvalidConfig(format!(
                "flat_threshold must be within [0, 1), got {threshold}"
            )));
        }
        Ok(())
    }

    /// The hexagram table: the configured rows, or the built-in table.
    pub fn hexagram_table(&self) -> Result<HexagramTable, OracleError> {
        match &self.hexagrams {
            Some(rows) => HexagramTable::from_entries(rows),
            None => Ok(HexagramTable::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::EngineKind;

    #[test]
    fn test_default_validates() {
        let config = OracleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.settle.delay, 5.0);
        assert_eq!(config.settle.mode, SettleMode::FixedDelay);
        assert_eq!(config.classifier.flat_threshold, 0.7);
        assert!(config.hexagram_table().unwrap().is_total());
    }

    #[test]
    fn test_slots_match_browser_layout() {
        let coins = CoinConfig::default();
        assert_eq!(coins.slot(0), Vec3::new(-5.0, 10.0, 0.0));
        assert_eq!(coins.slot(1), Vec3::new(0.0, 12.0, 0.0));
        assert_eq!(coins.slot(2), Vec3::new(5.0, 14.0, 0.0));
        assert_eq!(coins.base_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "seed": 42,
            "physics": { "engine": "fallback" },
            "settle": { "mode": "velocity_threshold", "max_settle": 8.0 }
        }"#;
        let config: OracleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.physics.engine, EngineKind::Fallback);
        assert_eq!(config.settle.mode, SettleMode::VelocityThreshold);
        assert_eq!(config.settle.max_settle, 8.0);
        assert_eq!(config.settle.delay, 5.0);
        assert_eq!(config.coins, CoinConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hexagram_override_from_json() {
        let json = r#"{ "hexagrams": [ { "key": "阳阳阳", "name": "Heaven", "meaning": "Creative" } ] }"#;
        let config: OracleConfig = serde_json::from_str(json).unwrap();
        let table = config.hexagram_table().unwrap();
        assert_eq!(table.missing_keys().len(), 7);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = OracleConfig::default();
        config.coins.mass = 0.0;
        assert!(matches!(config.validate(), Err(OracleError::InvalidConfig(_))));

        let mut config = OracleConfig::default();
        config.settle.delay = -1.0;
        assert!(config.validate().is_err());

        let mut config = OracleConfig::default();
        config.classifier.flat_threshold = 1.2;
        assert!(config.validate().is_err());

        let mut config = OracleConfig::default();
        config.physics.time_step = 0.0;
        assert!(matches!(config.validate(), Err(OracleError::Physics(_))));

        let mut config = OracleConfig::default();
        config.toss.spin = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_contact_params_left_to_engine_factory() {
        let mut config = OracleConfig::default();
        config.physics.contact.substeps = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settle_mode_parse() {
        assert_eq!("fixed".parse::<SettleMode>().unwrap(), SettleMode::FixedDelay);
        assert_eq!(
            "velocity_threshold".parse::<SettleMode>().unwrap(),
            SettleMode::VelocityThreshold
        );
        assert!("quiescence".parse::<SettleMode>().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = OracleConfig::load(Path::new("/nonexistent/coin_oracle.json"));
        assert!(matches!(result, Err(OracleError::Io(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = OracleConfig::default();
        let json = config.to_json().unwrap();
        let back: OracleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
