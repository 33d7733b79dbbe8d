//! Initiative calculator - Turn order for an encounter

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::DiceRoller;
use crate::domain::entities::Combatant;
use crate::domain::value_objects::CombatantId;

pub const INITIATIVE_DIE: u32 = 20;

/// One combatant's initiative roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    pub combatant_id: CombatantId,
    pub roll: u32,
    pub dexterity_modifier: i32,
    pub score: i32,
    pub tie_break_key: u128,
}

impl InitiativeEntry {
    /// Turn order comparison: higher score first, then higher dexterity,
    /// then the pre-assigned tie-break key.
    fn turn_order(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.dexterity_modifier.cmp(&self.dexterity_modifier))
            .then_with(|| self.tie_break_key.cmp(&other.tie_break_key))
    }
}

/// Roll a d20 for every combatant (in roster order) and sort into turn order.
pub fn roll_initiative(combatants: &[Combatant], dice: &mut dyn DiceRoller) -> Vec<InitiativeEntry> {
    let mut entries: Vec<InitiativeEntry> = combatants
        .iter()
        .map(|c| {
            let roll = dice.roll(INITIATIVE_DIE);
            InitiativeEntry {
                combatant_id: c.id,
                roll,
                dexterity_modifier: c.dexterity_modifier(),
                score: roll as i32 + c.dexterity_modifier(),
                tie_break_key: c.id.tie_break_key(),
            }
        })
        .collect();

    entries.sort_by(InitiativeEntry::turn_order);
    entries
}
