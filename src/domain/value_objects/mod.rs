//! Value objects - Immutable objects defined by their attributes

mod action;
mod dice;
mod ids;
mod weapon;

pub use action::CombatAction;
pub use dice::{DiceError, DiceExpression, MAX_DICE_COUNT, MAX_DIE_SIDES};
pub use ids::*;
pub use weapon::{Weapon, WeaponRef};
