//! Domain services - Pure combat rules with no state of their own

mod attack;
mod damage;
mod dice;
mod enemy_ai;
mod initiative;

pub use attack::{judge_attack, resolve_attack, AttackVerdict, ATTACK_DIE};
pub use damage::{calculate_damage, DamageRoll};
pub use dice::{DiceRoll, DiceRoller, SequenceDiceRoller};
pub use enemy_ai::{
    decide_action, evaluate_behavior, select_target, AiDecision, TargetPriority, AGGRESSIVE_ABOVE,
};
pub use initiative::{roll_initiative, InitiativeEntry, INITIATIVE_DIE};
