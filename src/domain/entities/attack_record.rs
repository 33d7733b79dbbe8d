//! Attack record - Immutable history entry for one resolved attack

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CombatantId, DiceExpression};

/// One resolved attack, appended to the encounter history and never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub round: u32,
    pub attacker_id: CombatantId,
    pub target_id: CombatantId,
    /// Unmodified d20 result
    pub raw_roll: u32,
    /// d20 plus attack bonus
    pub attack_total: i32,
    pub target_armor_class: u32,
    pub hit: bool,
    pub critical: bool,
    pub weapon_name: String,
    /// Damage dice as rolled (doubled on a critical hit)
    pub damage_dice: DiceExpression,
    /// Individual damage dice; empty on a miss
    pub damage_rolls: Vec<u32>,
    /// Sum of the damage dice before modifiers
    pub raw_damage: u32,
    pub total_damage: u32,
    pub target_health_after: u32,
}

impl AttackRecord {
    pub fn summary(&self) -> String {
        if !self.hit {
            return format!(
                "{} missed ({} vs AC {})",
                self.weapon_name, self.attack_total, self.target_armor_class
            );
        }
        format!(
            "{}{} hit for {} damage ({}), target at {} HP",
            if self.critical { "Critical! " } else { "" },
            self.weapon_name,
            self.total_damage,
            self.damage_dice,
            self.target_health_after
        )
    }
}
