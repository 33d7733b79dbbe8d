//! Damage calculator - Weapon dice with critical-hit dice doubling

use serde::{Deserialize, Serialize};

use super::DiceRoller;
use crate::domain::value_objects::DiceExpression;

/// Damage produced by one hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Expression actually rolled, including the flat modifier
    pub expression: DiceExpression,
    pub rolls: Vec<u32>,
    /// Sum of the dice before the modifier
    pub raw: u32,
    /// Final damage, never negative
    pub total: u32,
}

/// Roll damage for a hit.
///
/// `modifier` replaces any constant in `dice` and is added exactly once. On a
/// critical hit the number of dice is doubled before rolling (`1d8` → `2d8`);
/// the modifier is not doubled.
pub fn calculate_damage(
    dice_expr: &DiceExpression,
    modifier: i32,
    critical: bool,
    dice: &mut dyn DiceRoller,
) -> DamageRoll {
    let base = dice_expr.with_modifier(modifier);
    let expression = if critical {
        base.with_doubled_dice()
    } else {
        base
    };

    let roll = dice.roll_dice(&expression);
    DamageRoll {
        expression,
        raw: roll.dice_sum(),
        total: roll.total.max(0) as u32,
        rolls: roll.rolls,
    }
}
