//! RNG-backed dice roller adapter

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::application::ports::outbound::DiceRollerFactory;
use crate::domain::services::DiceRoller;

/// Uniform dice backed by a seedable standard RNG
#[derive(Debug, Clone)]
pub struct RandomDiceRoller {
    rng: StdRng,
}

impl RandomDiceRoller {
    /// Reproducible roller; the same seed yields the same rolls
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl DiceRoller for RandomDiceRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// Creates a [`RandomDiceRoller`] per encounter.
///
/// With a base seed configured, encounters without their own seed still get
/// reproducible dice (derived from the base seed and a creation counter).
#[derive(Debug, Default)]
pub struct RandomDiceFactory {
    base_seed: Option<u64>,
    created: std::sync::atomic::AtomicU64,
}

impl RandomDiceFactory {
    pub fn new(base_seed: Option<u64>) -> Self {
        Self {
            base_seed,
            created: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

impl DiceRollerFactory for RandomDiceFactory {
    fn create(&self, seed: Option<u64>) -> Box<dyn DiceRoller> {
        let n = self
            .created
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        match seed.or_else(|| self.base_seed.map(|base| base.wrapping_add(n))) {
            Some(seed) => {
                tracing::debug!(seed, "Creating seeded dice roller");
                Box::new(RandomDiceRoller::seeded(seed))
            }
            None => Box::new(RandomDiceRoller::from_entropy()),
        }
    }
}
