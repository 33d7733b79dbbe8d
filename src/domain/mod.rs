//! Domain layer - Combat rules with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: Combatant, AttackRecord
//! - Value Objects: identifiers, dice expressions, weapons, actions
//! - Aggregates: CombatEncounter aggregate root
//! - Domain Services: initiative, attack, damage and enemy AI rules

pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;
