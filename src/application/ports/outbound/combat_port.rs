//! Combat collaborator ports - Dice and weapon data consumed by the engine
//!
//! Both are treated as immediately-returning lookups; any real latency or
//! randomness source lives behind the adapter.

use crate::domain::services::DiceRoller;
use crate::domain::value_objects::{Weapon, WeaponRef};

/// Creates the dice roller owned by one encounter
pub trait DiceRollerFactory: Send + Sync {
    /// A seed makes the encounter replayable; `None` uses fresh randomness
    fn create(&self, seed: Option<u64>) -> Box<dyn DiceRoller>;
}

/// Read-only weapon lookup
pub trait WeaponCatalogPort: Send + Sync {
    /// `None` when the reference is not in the catalog
    fn find_weapon(&self, weapon: &WeaponRef) -> Option<Weapon>;
}
