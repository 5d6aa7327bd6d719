//! Coin scene setup and toss randomization

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use super::config::{CoinConfig, TossConfig};
use super::reading::COIN_COUNT;
use crate::physics::types::quat_from_euler_xyz;
use crate::physics::{BodyHandle, CoinShape, PhysicsWorld, RigidBody};

/// Initial conditions handed to one coin by a toss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TossLaunch {
    pub position: Vec3,
    pub orientation: Quat,
    pub impulse: Vec3,
    pub angular_velocity: Vec3,
}

/// Handles of the three coins inside a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy)]
pub struct CoinSet {
    coins: [BodyHandle; COIN_COUNT],
}

impl CoinSet {
    /// Add the ground and three resting coins to `world`.
    pub fn spawn(world: &mut PhysicsWorld, config: &CoinConfig) -> Self {
        let ground_shape = CoinShape {
            radius: 15.0,
            height: 0.0,
        };
        world.add_body(RigidBody::fixed(ground_shape, Vec3::ZERO));
        let base = config.base_rotation();
        let coins = std::array::from_fn(|i| {
            world.add_body(RigidBody::new(
                config.mass,
                config.shape,
                config.slot(i),
                base,
            ))
        });
        tracing::debug!(count = COIN_COUNT, "coins created");
        Self { coins }
    }

    pub fn handles(&self) -> &[BodyHandle; COIN_COUNT] {
        &self.coins
    }

    /// Coin bodies in slot order; missing bodies are skipped.
    pub fn bodies<'a>(&'a self, world: &'a PhysicsWorld) -> impl Iterator<Item = &'a RigidBody> {
        self.coins.iter().filter_map(move |h| world.body(*h))
    }

    /// Reset every coin and launch it with random initial conditions.
    pub fn toss<R: Rng>(
        &self,
        world: &mut PhysicsWorld,
        coins: &CoinConfig,
        toss: &TossConfig,
        rng: &mut R,
    ) -> [TossLaunch; COIN_COUNT] {
        let launches: [TossLaunch; COIN_COUNT] =
            std::array::from_fn(|i| random_launch(coins, toss, i, rng));
        for (i, (handle, launch)) in self.coins.iter().zip(&launches).enumerate() {
            let launched = world.set_pose(*handle, launch.position, launch.orientation)
                && world.apply_impulse(*handle, launch.impulse)
                && world.set_angular_velocity(*handle, launch.angular_velocity);
            if launched {
                tracing::debug!(
                    coin = i + 1,
                    position = ?launch.position,
                    impulse = ?launch.impulse,
                    spin = ?launch.angular_velocity,
                    "coin launched"
                );
            } else {
                tracing::warn!(coin = i + 1, "coin body missing, not launched");
            }
        }
        launches
    }
}

/// Symmetric sample in `[-width/2, width/2)`.
fn centered<R: Rng>(rng: &mut R, width: f32) -> f32 {
    (rng.r#gen::<f32>() - 0.5) * width
}

fn random_launch<R: Rng>(coins: &CoinConfig, toss: &TossConfig, index: usize, rng: &mut R) -> TossLaunch {
    let slot = coins.slot(index);
    let position = Vec3::new(
        slot.x + centered(rng, toss.position_jitter),
        slot.y,
        centered(rng, toss.position_jitter),
    );

    let euler = Vec3::new(
        rng.r#gen::<f32>() * TAU,
        rng.r#gen::<f32>() * TAU,
        rng.r#gen::<f32>() * TAU,
    );
    let orientation = coins.base_rotation() * quat_from_euler_xyz(euler);

    let impulse = Vec3::new(
        centered(rng, toss.lateral_impulse),
        rng.r#gen::<f32>() * toss.upward_impulse_range + toss.upward_impulse_min,
        centered(rng, toss.lateral_impulse),
    );
    let angular_velocity = Vec3::new(
        centered(rng, toss.spin),
        centered(rng, toss.spin),
        centered(rng, toss.spin),
    );

    TossLaunch {
        position,
        orientation,
        impulse,
        angular_velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawn_places_coins_in_slots() {
        let mut world = PhysicsWorld::default();
        let config = CoinConfig::default();
        let set = CoinSet::spawn(&mut world, &config);

        assert_eq!(world.len(), 4);
        assert_eq!(world.bodies().iter().filter(|b| b.is_static()).count(), 1);
        for (i, body) in set.bodies(&world).enumerate() {
            assert_eq!(body.position, config.slot(i));
            assert_eq!(body.velocity, Vec3::ZERO);
            assert_eq!(body.mass, 1.0);
        }
    }

    #[test]
    fn test_toss_ranges() {
        let mut world = PhysicsWorld::default();
        let coins = CoinConfig::default();
        let toss = TossConfig::default();
        let set = CoinSet::spawn(&mut world, &coins);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let launches = set.toss(&mut world, &coins, &toss, &mut rng);
            for (i, launch) in launches.iter().enumerate() {
                let slot = coins.slot(i);
                assert!((launch.position.x - slot.x).abs() <= 1.0);
                assert_eq!(launch.position.y, slot.y);
                assert!(launch.position.z.abs() <= 1.0);
                assert!(launch.impulse.x.abs() <= 2.5 && launch.impulse.z.abs() <= 2.5);
                assert!((5.0..=10.0).contains(&launch.impulse.y));
                assert!(launch.angular_velocity.abs().max_element() <= 5.0);
                assert!((launch.orientation.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_toss_resets_previous_motion() {
        let mut world = PhysicsWorld::default();
        let coins = CoinConfig::default();
        let toss = TossConfig::default();
        let set = CoinSet::spawn(&mut world, &coins);
        let first = set.handles()[0];
        world.body_mut(first).unwrap().velocity = Vec3::new(100.0, 100.0, 100.0);
        world.apply_force(first, Vec3::ONE);

        let mut rng = StdRng::seed_from_u64(3);
        let launches = set.toss(&mut world, &coins, &toss, &mut rng);

        let body = world.body(first).unwrap();
        // Mass is 1, so velocity equals the impulse exactly.
        assert_eq!(body.velocity, launches[0].impulse);
        assert_eq!(body.angular_velocity, launches[0].angular_velocity);
        assert_eq!(body.position, launches[0].position);
        assert_eq!(body.force, Vec3::ZERO);
    }

    #[test]
    fn test_same_seed_same_launch() {
        let coins = CoinConfig::default();
        let toss = TossConfig::default();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(
            random_launch(&coins, &toss, 1, &mut a),
            random_launch(&coins, &toss, 1, &mut b)
        );
    }
}
