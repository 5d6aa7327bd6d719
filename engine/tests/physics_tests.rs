//! Physics Tests - Engines, Ground Response and Orientation
//!
//! Exercises both engines through the shared `PhysicsEngine` interface.

use glam::{Quat, Vec3};
use coin_oracle_engine::physics::{
    CoinShape, ContactEngine, ContactParams, EngineKind, FallbackEngine, FallbackParams,
    PhysicsConfig, PhysicsEngine, PhysicsWorld, RigidBody, create_engine,
};

const DT: f32 = 1.0 / 60.0;

fn coin_at(position: Vec3, orientation: Quat) -> RigidBody {
    RigidBody::new(1.0, CoinShape::default(), position, orientation)
}

fn engines() -> Vec<Box<dyn PhysicsEngine>> {
    vec![
        Box::new(FallbackEngine::new(FallbackParams::default())),
        Box::new(ContactEngine::new(ContactParams::default()).unwrap()),
    ]
}

// ============================================================================
// Static bodies
// ============================================================================

#[test]
fn test_static_body_never_moves() {
    for mut engine in engines() {
        let mut world = PhysicsWorld::default();
        let ground = world.add_body(RigidBody::fixed(CoinShape::default(), Vec3::new(0.0, -3.0, 0.0)));
        world.apply_impulse(ground, Vec3::new(0.0, 100.0, 0.0));
        world.apply_force(ground, Vec3::new(5.0, 0.0, 0.0));

        for dt in [0.0, 1e-4, DT, 0.5, 10.0] {
            engine.step(&mut world, dt);
            let body = world.body(ground).unwrap();
            assert_eq!(body.position, Vec3::new(0.0, -3.0, 0.0), "{} moved ground", engine.name());
            assert_eq!(body.velocity, Vec3::ZERO);
            assert_eq!(body.orientation, Quat::IDENTITY);
        }
    }
}

// ============================================================================
// Fallback ground response
// ============================================================================

#[test]
fn test_fallback_ground_clamp_is_exact() {
    let mut engine = FallbackEngine::default();
    let mut world = PhysicsWorld::default();
    let handle = world.add_body(coin_at(Vec3::new(0.0, 0.12, 0.0), Quat::IDENTITY));
    {
        let body = world.body_mut(handle).unwrap();
        body.velocity = Vec3::new(2.0, -3.0, -1.0);
        body.angular_velocity = Vec3::new(1.0, 2.0, 3.0);
    }

    engine.step(&mut world, DT);

    let body = world.body(handle).unwrap();
    let vy_before_clamp = -3.0 - 9.82 * DT;
    assert_eq!(body.position.y, 0.1);
    assert!((body.velocity.y - (-vy_before_clamp * 0.5)).abs() < 1e-5);
    assert!(body.velocity.y > 0.0);
    assert!((body.velocity.x - 2.0 * 0.95).abs() < 1e-6);
    assert!((body.velocity.z + 0.95).abs() < 1e-6);
    assert!((body.angular_velocity - Vec3::new(0.95, 1.9, 2.85)).length() < 1e-5);
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn test_orientation_stays_unit_in_both_engines() {
    for mut engine in engines() {
        let mut world = PhysicsWorld::default();
        let handle = world.add_body(coin_at(Vec3::new(0.0, 30.0, 0.0), Quat::from_rotation_x(0.4)));
        world.set_angular_velocity(handle, Vec3::new(7.0, -3.0, 11.0));

        for step in 0..1000 {
            engine.step(&mut world, DT);
            let q = world.body(handle).unwrap().orientation;
            assert!(
                (q.length() - 1.0).abs() < 1e-4,
                "{} step {step}: |q| = {}",
                engine.name(),
                q.length()
            );
        }
    }
}

// ============================================================================
// Contact engine
// ============================================================================

#[test]
fn test_contact_coin_dropped_flat_comes_to_rest() {
    let mut engine = ContactEngine::new(ContactParams::default()).unwrap();
    let mut world = PhysicsWorld::default();
    let handle = world.add_body(coin_at(Vec3::new(0.0, 3.0, 0.0), Quat::IDENTITY));

    for _ in 0..600 {
        engine.step(&mut world, DT);
    }

    let body = world.body(handle).unwrap();
    assert!(body.asleep);
    assert_eq!(body.position.y, 0.1, "rests at half the coin height");
    assert_eq!(body.velocity, Vec3::ZERO);
    assert_eq!(body.angular_velocity, Vec3::ZERO);
    assert!(body.up_axis().dot(Vec3::Y) > 0.9999);
}

#[test]
fn test_both_engines_report_resting_coins() {
    for mut engine in engines() {
        let mut world = PhysicsWorld::default();
        let handle = world.add_body(coin_at(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY));
        world.set_angular_velocity(handle, Vec3::new(0.0, 1.5, 0.0));

        let rested_at = (1..=600).find(|_| {
            engine.step(&mut world, DT);
            engine.is_at_rest(world.body(handle).unwrap(), 0.05, 0.05)
        });
        let frames = rested_at.unwrap_or_else(|| panic!("{} coin never came to rest", engine.name()));
        assert!(frames < 300, "{} coin took {frames} frames", engine.name());
    }
}

#[test]
fn test_contact_coins_do_not_interact() {
    let mut engine = ContactEngine::new(ContactParams::default()).unwrap();
    let mut world = PhysicsWorld::default();
    let a = world.add_body(coin_at(Vec3::new(0.0, 5.0, 0.0), Quat::IDENTITY));
    let b = world.add_body(coin_at(Vec3::new(0.5, 5.0, 0.0), Quat::IDENTITY));

    for _ in 0..30 {
        engine.step(&mut world, DT);
    }
    let pa = world.body(a).unwrap().position;
    let pb = world.body(b).unwrap().position;
    assert!((pa.y - pb.y).abs() < 1e-5);
    assert!((pb.x - pa.x - 0.5).abs() < 1e-5);
}

#[test]
fn test_engine_factory_falls_back_on_bad_params() {
    let mut config = PhysicsConfig::default();
    config.contact.rim_samples = 1;
    let engine = create_engine(EngineKind::Contact, &config);
    assert_eq!(engine.name(), "fallback");

    assert!(ContactEngine::new(config.contact).is_err());
}

#[test]
fn test_impulse_ignored_for_massless_body() {
    let mut world = PhysicsWorld::default();
    let ground = world.add_body(RigidBody::fixed(CoinShape::default(), Vec3::ZERO));
    let coin = world.add_body(coin_at(Vec3::new(0.0, 10.0, 0.0), Quat::IDENTITY));

    world.apply_impulse(ground, Vec3::new(0.0, 8.0, 0.0));
    world.apply_impulse(coin, Vec3::new(0.0, 8.0, 0.0));

    assert_eq!(world.body(ground).unwrap().velocity, Vec3::ZERO);
    assert_eq!(world.body(coin).unwrap().velocity, Vec3::new(0.0, 8.0, 0.0));
}
