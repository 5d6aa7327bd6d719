//! Outcome classifier
//!
//! Reads a settled coin's orientation as heads or tails. The coin's local
//! up axis is rotated into world space and compared with world up:
//!
//! - `d = (q * Y) · Y`
//! - `|d| > flat_threshold`: the coin lies basically flat, `d > 0` is heads
//! - otherwise the coin rests on its edge and the outcome is a fair coin flip
//!
//! Unusable orientations also get a fair flip; classification never fails.

use glam::Quat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::reading::Outcome;
use crate::physics::types::UP;

/// Default flatness band: about 45.6° from vertical.
pub const DEFAULT_FLAT_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classifier {
    /// Minimum |cos(tilt)| for a decisive read
    pub flat_threshold: f32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            flat_threshold: DEFAULT_FLAT_THRESHOLD,
        }
    }
}

impl Classifier {
    pub fn new(flat_threshold: f32) -> Self {
        Self { flat_threshold }
    }

    /// Cosine of the tilt between the coin's up axis and world up.
    /// `None` when the orientation is not a usable rotation.
    pub fn tilt(orientation: Quat) -> Option<f32> {
        if !orientation.is_finite() {
            return None;
        }
        let len = orientation.length();
        if len < 1e-6 {
            return None;
        }
        let up = (orientation / len) * UP;
        Some(up.dot(UP).clamp(-1.0, 1.0))
    }

    /// Decide from a tilt cosine.
    pub fn classify_tilt<R: Rng>(&self, d: f32, rng: &mut R) -> Outcome {
        if d.abs() > self.flat_threshold {
            if d > 0.0 { Outcome::Heads } else { Outcome::Tails }
        } else {
            Outcome::random(rng)
        }
    }

    pub fn classify<R: Rng>(&self, orientation: Quat, rng: &mut R) -> Outcome {
        match Self::tilt(orientation) {
            Some(d) => {
                let outcome = self.classify_tilt(d, rng);
                tracing::debug!(tilt = d, outcome = %outcome, "coin classified");
                outcome
            }
            None => {
                let outcome = Outcome::random(rng);
                tracing::warn!(?orientation, outcome = %outcome, "unusable orientation, random outcome");
                outcome
            }
        }
    }

    /// Classify a body that may be missing from the world.
    pub fn classify_or_random<R: Rng>(&self, orientation: Option<Quat>, rng: &mut R) -> Outcome {
        match orientation {
            Some(q) => self.classify(q, rng),
            None => {
                let outcome = Outcome::random(rng);
                tracing::warn!(outcome = %outcome, "coin body missing, random outcome");
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    /// Rotation about X whose up axis has the given cosine with world up.
    fn tilted(d: f32) -> Quat {
        Quat::from_rotation_x(d.clamp(-1.0, 1.0).acos())
    }

    #[test]
    fn test_deterministic_when_flat() {
        let classifier = Classifier::default();
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(classifier.classify_tilt(1.0, &mut rng), Outcome::Heads);
            assert_eq!(classifier.classify_tilt(-1.0, &mut rng), Outcome::Tails);
            assert_eq!(classifier.classify_tilt(0.71, &mut rng), Outcome::Heads);
            assert_eq!(classifier.classify_tilt(-0.71, &mut rng), Outcome::Tails);
        }
    }

    #[test]
    fn test_orientation_paths() {
        let classifier = Classifier::default();
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(classifier.classify(Quat::IDENTITY, &mut rng), Outcome::Heads);
            assert_eq!(
                classifier.classify(Quat::from_rotation_z(std::f32::consts::PI), &mut rng),
                Outcome::Tails
            );
            assert_eq!(classifier.classify(tilted(0.71), &mut rng), Outcome::Heads);
            assert_eq!(classifier.classify(tilted(-0.71), &mut rng), Outcome::Tails);
        }
    }

    #[test]
    fn test_tilt_ignores_spin_about_up() {
        let q = Quat::from_rotation_y(1.3);
        let d = Classifier::tilt(q).unwrap();
        assert!((d - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_rest_is_fair() {
        let classifier = Classifier::default();
        let mut rng = rng();
        let trials = 10_000;
        let heads = (0..trials)
            .filter(|_| classifier.classify(tilted(0.0), &mut rng) == Outcome::Heads)
            .count();
        let ratio = heads as f64 / trials as f64;
        assert!((0.45..0.55).contains(&ratio), "heads ratio {ratio}");
    }

    #[test]
    fn test_threshold_boundary_is_ambiguous() {
        let classifier = Classifier::default();
        let mut rng = rng();
        let mut seen_heads = false;
        let mut seen_tails = false;
        for _ in 0..200 {
            match classifier.classify_tilt(0.7, &mut rng) {
                Outcome::Heads => seen_heads = true,
                Outcome::Tails => seen_tails = true,
            }
        }
        assert!(seen_heads && seen_tails);
    }

    #[test]
    fn test_malformed_orientation_falls_back_to_random() {
        let classifier = Classifier::default();
        let mut rng = rng();
        assert!(Classifier::tilt(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0)).is_none());
        assert!(Classifier::tilt(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)).is_none());

        let trials = 2_000;
        let heads = (0..trials)
            .filter(|_| {
                classifier.classify(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0), &mut rng)
                    == Outcome::Heads
            })
            .count();
        assert!(heads > 800 && heads < 1200, "heads = {heads}");

        let missing = classifier.classify_or_random(None, &mut rng);
        assert!(Outcome::ALL.contains(&missing));
    }

    #[test]
    fn test_unnormalized_orientation_is_scaled() {
        let classifier = Classifier::default();
        let mut rng = rng();
        let q = Quat::from_xyzw(0.0, 0.0, 0.0, 3.0);
        assert_eq!(classifier.classify(q, &mut rng), Outcome::Heads);
    }
}
