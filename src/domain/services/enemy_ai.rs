//! Enemy AI - Health-driven behavior states and target selection
//!
//! Everything here is a pure function of the acting enemy and a snapshot of
//! the roster, so decisions can be tested without an encounter.
//!
//! | Health ratio                          | Behavior     | Action                    |
//! |---------------------------------------|--------------|---------------------------|
//! | `> 0.5`                               | `Aggressive` | attack the weakest target |
//! | `flee_threshold ..= 0.5`              | `Defensive`  | attack the lowest risk    |
//! | `< flee_threshold`                    | `Fleeing`    | flee                      |

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{BehaviorState, Combatant, Side};
use crate::domain::value_objects::{CombatAction, CombatantId};

/// Ratio above which an enemy fights aggressively
pub const AGGRESSIVE_ABOVE: f64 = 0.5;

/// How an attacker ranks candidate targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPriority {
    /// Lowest current health first
    Weakest,
    /// Lowest dexterity modifier first (least able to react)
    LowestRisk,
}

impl From<BehaviorState> for TargetPriority {
    fn from(state: BehaviorState) -> Self {
        match state {
            BehaviorState::Defensive => Self::LowestRisk,
            BehaviorState::Aggressive | BehaviorState::Fleeing => Self::Weakest,
        }
    }
}

/// Behavior state and chosen action for one enemy turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDecision {
    pub behavior: BehaviorState,
    pub action: CombatAction,
}

/// Map a health ratio to a behavior state.
///
/// Fleeing is strictly below the threshold; exactly 0.5 is already defensive.
pub fn evaluate_behavior(health_ratio: f64, flee_threshold: f64) -> BehaviorState {
    if health_ratio < flee_threshold {
        BehaviorState::Fleeing
    } else if health_ratio > AGGRESSIVE_ABOVE {
        BehaviorState::Aggressive
    } else {
        BehaviorState::Defensive
    }
}

/// Choose an action for an enemy. Returns `None` for player characters.
pub fn decide_action(enemy: &Combatant, roster: &[Combatant]) -> Option<AiDecision> {
    let profile = enemy.enemy_profile()?;
    let behavior = evaluate_behavior(enemy.health_ratio(), profile.flee_threshold);

    let action = match behavior {
        BehaviorState::Fleeing => CombatAction::Flee,
        BehaviorState::Aggressive | BehaviorState::Defensive => {
            match select_target(behavior.into(), enemy.side(), roster) {
                Some(target) => CombatAction::attack(target),
                None => CombatAction::Pass,
            }
        }
    };

    Some(AiDecision { behavior, action })
}

/// Pick the best active opponent of `attacker_side` according to `priority`.
///
/// Ties fall through to lowest armor class, then the stable tie-break key.
pub fn select_target(
    priority: TargetPriority,
    attacker_side: Side,
    roster: &[Combatant],
) -> Option<CombatantId> {
    roster
        .iter()
        .filter(|c| c.is_active() && c.side() == attacker_side.opponent())
        .min_by(|a, b| compare_targets(priority, a, b))
        .map(|c| c.id)
}

fn compare_targets(priority: TargetPriority, a: &Combatant, b: &Combatant) -> Ordering {
    let primary = match priority {
        TargetPriority::Weakest => a.current_health().cmp(&b.current_health()),
        TargetPriority::LowestRisk => a.dexterity_modifier().cmp(&b.dexterity_modifier()),
    };
    primary
        .then_with(|| a.armor_class.cmp(&b.armor_class))
        .then_with(|| a.id.tie_break_key().cmp(&b.id.tie_break_key()))
}
