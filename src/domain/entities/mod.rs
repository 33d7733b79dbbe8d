//! Domain entities - Core business objects with identity

mod attack_record;
mod combatant;

pub use attack_record::AttackRecord;
pub use combatant::{
    BehaviorState, Combatant, CombatantKind, CombatantStatus, EnemyProfile, Side,
    DEFAULT_FLEE_THRESHOLD, MAX_DEXTERITY_MODIFIER, MIN_ARMOR_CLASS, MIN_DEXTERITY_MODIFIER,
};
