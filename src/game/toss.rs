//! Toss sequencing
//!
//! [`Simulation`] owns the physics world, the chosen engine, the coins and
//! the RNG, and runs the toss cycle:
//!
//! ```text
//! Idle --request_toss--> Tossing --> Settling --settle condition--> Resolved --> Idle
//! ```
//!
//! `Tossing` and `Resolved` are passed through within a single call; a host
//! only ever observes `Idle` or `Settling` between calls. A toss requested
//! while not idle is ignored.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::classifier::Classifier;
use super::coins::CoinSet;
use super::config::{OracleConfig, SettleConfig, SettleMode};
use super::display::{DisplaySink, TriggerState};
use super::error::OracleError;
use super::hexagram::HexagramTable;
use super::reading::{COIN_COUNT, Outcome, Reading, ReadingKey};
use crate::physics::{BodyHandle, PhysicsEngine, PhysicsWorld, create_engine};
use crate::render::{CoinInstance, coin_instances};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TossPhase {
    Idle,
    Tossing,
    Settling,
    Resolved,
}

impl TossPhase {
    pub fn name(self) -> &'static str {
        match self {
            TossPhase::Idle => "idle",
            TossPhase::Tossing => "tossing",
            TossPhase::Settling => "settling",
            TossPhase::Resolved => "resolved",
        }
    }
}

/// One-shot timer armed by a toss.
#[derive(Debug, Clone, Copy, Default)]
struct SettleTimer {
    elapsed: Duration,
    /// How long every coin has been continuously still
    still_for: Duration,
}

impl SettleTimer {
    /// Advance by `dt` and report whether the settle condition fired.
    fn advance(&mut self, dt: Duration, settle: &SettleConfig, all_still: bool) -> bool {
        self.elapsed += dt;
        match settle.mode {
            SettleMode::FixedDelay => self.elapsed >= secs(settle.delay),
            SettleMode::VelocityThreshold => {
                if all_still {
                    self.still_for += dt;
                } else {
                    self.still_for = Duration::ZERO;
                }
                self.still_for >= secs(settle.rest_hold) || self.elapsed >= secs(settle.max_settle)
            }
        }
    }
}

/// Seconds to `Duration`; invalid values read as zero.
fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

pub struct Simulation {
    config: OracleConfig,
    world: PhysicsWorld,
    engine: Box<dyn PhysicsEngine>,
    coins: CoinSet,
    phase: TossPhase,
    timer: SettleTimer,
    rng: StdRng,
    table: HexagramTable,
    classifier: Classifier,
    last_reading: Option<Reading>,
    tosses: u64,
}

impl Simulation {
    /// Build the scene with the engine named in the configuration.
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let engine = create_engine(config.physics.engine, &config.physics);
        Self::with_engine(config, engine)
    }

    /// Build the scene around an engine chosen by the caller.
    pub fn with_engine(
        config: OracleConfig,
        engine: Box<dyn PhysicsEngine>,
    ) -> Result<Self, OracleError> {
        config.validate()?;
        let table = config.hexagram_table()?;

        let mut world = PhysicsWorld::new(config.physics.gravity);
        let coins = CoinSet::spawn(&mut world, &config.coins);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            engine = engine.name(),
            settle = ?config.settle.mode,
            seed = ?config.seed,
            "simulation ready"
        );

        Ok(Self {
            classifier: config.classifier,
            config,
            world,
            engine,
            coins,
            phase: TossPhase::Idle,
            timer: SettleTimer::default(),
            rng,
            table,
            last_reading: None,
            tosses: 0,
        })
    }

    /// Start a toss. Returns `false` (and changes nothing) unless idle.
    pub fn request_toss(&mut self, display: &mut dyn DisplaySink) -> bool {
        if self.phase != TossPhase::Idle {
            tracing::debug!(phase = self.phase.name(), "toss ignored, coins still in flight");
            return false;
        }

        self.phase = TossPhase::Tossing;
        display.clear_reading();
        self.coins.toss(
            &mut self.world,
            &self.config.coins,
            &self.config.toss,
            &mut self.rng,
        );
        display.show_trigger(&TriggerState::TOSSING);

        self.timer = SettleTimer::default();
        self.tosses += 1;
        self.phase = TossPhase::Settling;
        tracing::info!(toss = self.tosses, "coins tossed");
        true
    }

    /// Advance one display frame: one fixed physics step, then the settle
    /// timer by the wall-clock `elapsed` seconds. Returns the reading on the
    /// frame the toss resolves.
    pub fn frame(&mut self, elapsed: f32, display: &mut dyn DisplaySink) -> Option<Reading> {
        let elapsed = if elapsed.is_finite() && elapsed >= 0.0 {
            elapsed
        } else {
            tracing::warn!(elapsed, "invalid frame time, treated as zero");
            0.0
        };

        self.engine
            .step(&mut self.world, self.config.physics.time_step);

        if self.phase != TossPhase::Settling {
            return None;
        }

        let all_still = self.coins_at_rest();
        if !self.timer.advance(secs(elapsed), &self.config.settle, all_still) {
            return None;
        }

        let reading = self.resolve();
        display.show_reading(&reading);
        display.show_trigger(&TriggerState::AGAIN);
        self.phase = TossPhase::Idle;
        Some(reading)
    }

    fn resolve(&mut self) -> Reading {
        self.phase = TossPhase::Resolved;
        let outcomes: [Outcome; COIN_COUNT] = std::array::from_fn(|i| {
            let orientation = self
                .world
                .body(self.coins.handles()[i])
                .map(|b| b.orientation);
            self.classifier.classify_or_random(orientation, &mut self.rng)
        });
        let key = ReadingKey::new(outcomes);
        let hexagram = self.table.lookup(&key).cloned();

        match &hexagram {
            Some(h) => tracing::info!(
                toss = self.tosses,
                key = %key,
                hexagram = %h.name,
                settle_secs = self.timer.elapsed.as_secs_f32(),
                "toss resolved"
            ),
            None => tracing::error!(toss = self.tosses, key = %key, "no hexagram for reading key"),
        }

        let reading = Reading { key, hexagram };
        self.last_reading = Some(reading.clone());
        reading
    }

    /// Whether every coin is at rest under the configured settle epsilons,
    /// as judged by the running engine.
    pub fn coins_at_rest(&self) -> bool {
        let settle = &self.config.settle;
        self.coins.bodies(&self.world).all(|b| {
            self.engine
                .is_at_rest(b, settle.linear_epsilon, settle.angular_epsilon)
        })
    }

    pub fn phase(&self) -> TossPhase {
        self.phase
    }

    /// Trigger state matching the current phase.
    pub fn trigger_state(&self) -> TriggerState {
        match self.phase {
            TossPhase::Idle if self.tosses == 0 => TriggerState::INITIAL,
            TossPhase::Idle => TriggerState::AGAIN,
            _ => TriggerState::TOSSING,
        }
    }

    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    /// Number of tosses started so far.
    pub fn tosses(&self) -> u64 {
        self.tosses
    }

    /// Time since the current toss started.
    pub fn settle_elapsed(&self) -> Duration {
        self.timer.elapsed
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn coin_handles(&self) -> &[BodyHandle; COIN_COUNT] {
        self.coins.handles()
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Instance records for the three coins, in slot order.
    pub fn coin_instances(&self) -> Vec<CoinInstance> {
        coin_instances(self.coins.bodies(&self.world))
    }
}
