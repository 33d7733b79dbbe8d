//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::entities::DEFAULT_FLEE_THRESHOLD;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base seed for encounter dice; unset means fresh randomness
    pub dice_seed: Option<u64>,
    /// Round limit for simulated encounters
    pub max_rounds: u32,
    /// Flee threshold given to enemies that do not specify one
    pub default_flee_threshold: f64,
    /// Optional JSON weapon catalog; the built-in armory is used otherwise
    pub weapon_catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dice_seed: None,
            max_rounds: 50,
            default_flee_threshold: DEFAULT_FLEE_THRESHOLD,
            weapon_catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let dice_seed = match env::var("COMBAT_DICE_SEED") {
            Ok(seed) => Some(
                seed.parse()
                    .context("COMBAT_DICE_SEED must be an unsigned integer")?,
            ),
            Err(_) => None,
        };

        let max_rounds = match env::var("COMBAT_MAX_ROUNDS") {
            Ok(rounds) => rounds
                .parse()
                .context("COMBAT_MAX_ROUNDS must be a positive integer")?,
            Err(_) => defaults.max_rounds,
        };

        let default_flee_threshold: f64 = match env::var("COMBAT_DEFAULT_FLEE_THRESHOLD") {
            Ok(threshold) => threshold
                .parse()
                .context("COMBAT_DEFAULT_FLEE_THRESHOLD must be a number")?,
            Err(_) => defaults.default_flee_threshold,
        };
        if !(0.0..=1.0).contains(&default_flee_threshold) {
            anyhow::bail!(
                "COMBAT_DEFAULT_FLEE_THRESHOLD must be between 0.0 and 1.0, got {}",
                default_flee_threshold
            );
        }

        Ok(Self {
            dice_seed,
            max_rounds,
            default_flee_threshold,
            weapon_catalog_path: env::var("WEAPON_CATALOG_PATH").ok().map(PathBuf::from),
        })
    }
}
