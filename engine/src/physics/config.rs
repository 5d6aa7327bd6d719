//! Physics configuration
//!
//! Global parameters for the coin world and both engines. `Default`
//! reproduces the constants the browser toy shipped with.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::PhysicsError;
use super::world::DEFAULT_GRAVITY;

/// Longest accepted fixed step (seconds).
pub const MAX_TIME_STEP: f32 = 1.0;

/// Which engine drives the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Full engine: sub-stepped integration with rim contacts and friction.
    #[default]
    Contact,
    /// Minimal stepper with a resting-plane response.
    Fallback,
}

impl EngineKind {
    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Contact => "contact",
            EngineKind::Fallback => "fallback",
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contact" | "full" => Ok(EngineKind::Contact),
            "fallback" | "simple" => Ok(EngineKind::Fallback),
            other => Err(PhysicsError::UnknownEngine(other.to_string())),
        }
    }
}

/// Ground response of the fallback stepper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackParams {
    /// Fraction of vertical speed kept (and inverted) on ground contact
    pub restitution: f32,
    /// Multiplier applied to horizontal and angular velocity on ground contact
    pub damping: f32,
}

impl Default for FallbackParams {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            damping: 0.95,
        }
    }
}

/// Parameters of the contact engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactParams {
    /// Integration sub-steps per `step` call
    pub substeps: u32,
    /// Impulse solver passes per sub-step
    pub iterations: u32,
    /// Sample points on each face rim used as contact candidates
    pub rim_samples: u32,
    /// Coefficient of restitution against the ground
    pub restitution: f32,
    /// Closing speed below which contacts are treated as inelastic (m/s)
    pub restitution_threshold: f32,
    pub static_friction: f32,
    pub dynamic_friction: f32,
    /// Angular velocity decay rate (1/s)
    pub angular_damping: f32,
    /// Extra decay of horizontal and angular velocity while touching the ground (1/s)
    pub contact_damping: f32,
    /// Grounded bodies under both sleep speeds for `sleep_time` are put to rest (m/s)
    pub sleep_linear_speed: f32,
    /// (rad/s)
    pub sleep_angular_speed: f32,
    /// (seconds)
    pub sleep_time: f32,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            substeps: 4,
            iterations: 8,
            rim_samples: 16,
            restitution: 0.3,
            restitution_threshold: 1.0,
            static_friction: 0.6,
            dynamic_friction: 0.4,
            angular_damping: 0.2,
            contact_damping: 2.0,
            sleep_linear_speed: 0.1,
            sleep_angular_speed: 0.5,
            sleep_time: 0.5,
        }
    }
}

impl ContactParams {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.substeps == 0 || self.iterations == 0 {
            return Err(PhysicsError::InvalidParameter(
                "substeps and iterations must be at least 1".to_string(),
            ));
        }
        if self.rim_samples < 3 {
            return Err(PhysicsError::InvalidParameter(format!(
                "rim_samples must be at least 3, got {}",
                self.rim_samples
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidParameter(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        if self.static_friction < 0.0 || self.dynamic_friction < 0.0 {
            return Err(PhysicsError::InvalidParameter(
                "friction coefficients must be non-negative".to_string(),
            ));
        }
        if !(self.angular_damping >= 0.0 && self.contact_damping >= 0.0) {
            return Err(PhysicsError::InvalidParameter(
                "damping rates must be non-negative".to_string(),
            ));
        }
        if !(self.sleep_linear_speed > 0.0
            && self.sleep_angular_speed > 0.0
            && self.sleep_time >= 0.0)
        {
            return Err(PhysicsError::InvalidParameter(
                "sleep speeds must be positive and sleep_time non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the physics world and engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration vector (m/s²)
    pub gravity: Vec3,
    /// Fixed step handed to the engine once per frame (seconds)
    pub time_step: f32,
    pub engine: EngineKind,
    pub fallback: FallbackParams,
    pub contact: ContactParams,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            time_step: 1.0 / 60.0,
            engine: EngineKind::default(),
            fallback: FallbackParams::default(),
            contact: ContactParams::default(),
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidParameter(
                "gravity must be finite".to_string(),
            ));
        }
        if !(self.time_step > 0.0 && self.time_step <= MAX_TIME_STEP) {
            return Err(PhysicsError::InvalidParameter(format!(
                "time_step must be within (0, {MAX_TIME_STEP}], got {}",
                self.time_step
            )));
        }
        if !(0.0..=1.0).contains(&self.fallback.restitution)
            || !(0.0..=1.0).contains(&self.fallback.damping)
        {
            return Err(PhysicsError::InvalidParameter(
                "fallback restitution and damping must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_browser_constants() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity.y, -9.82);
        assert_eq!(config.fallback.restitution, 0.5);
        assert_eq!(config.fallback.damping, 0.95);
        assert!((config.time_step - 1.0 / 60.0).abs() < 1e-9);
        assert!(config.validate().is_ok());
        assert!(config.contact.validate().is_ok());
    }

    #[test]
    fn test_engine_kind_parse() {
        assert_eq!("contact".parse::<EngineKind>().unwrap(), EngineKind::Contact);
        assert_eq!(" Fallback ".parse::<EngineKind>().unwrap(), EngineKind::Fallback);
        assert!(matches!(
            "cannon".parse::<EngineKind>(),
            Err(PhysicsError::UnknownEngine(name)) if name == "cannon"
        ));
    }

    #[test]
    fn test_invalid_contact_params() {
        let mut params = ContactParams::default();
        params.substeps = 0;
        assert!(params.validate().is_err());

        let mut params = ContactParams::default();
        params.restitution = 1.5;
        assert!(params.validate().is_err());

        let mut params = ContactParams::default();
        params.rim_samples = 2;
        assert!(params.validate().is_err());

        let mut params = ContactParams::default();
        params.sleep_angular_speed = 0.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_time_step_bounds() {
        for bad in [0.0, -0.01, 1e30, f32::INFINITY, f32::NAN] {
            let config = PhysicsConfig {
                time_step: bad,
                ..PhysicsConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(PhysicsError::InvalidParameter(_))),
                "time_step {bad} accepted"
            );
        }
        let config = PhysicsConfig {
            time_step: MAX_TIME_STEP,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: PhysicsConfig =
            serde_json::from_str(r#"{ "engine": "fallback", "fallback": { "damping": 0.9 } }"#)
                .unwrap();
        assert_eq!(config.engine, EngineKind::Fallback);
        assert_eq!(config.fallback.damping, 0.9);
        assert_eq!(config.fallback.restitution, 0.5);
        assert_eq!(config.contact, ContactParams::default());
    }
}
