//! Attack resolver - d20 attack roll against armor class

use serde::{Deserialize, Serialize};

use super::DiceRoller;

pub const ATTACK_DIE: u32 = 20;
const NATURAL_CRITICAL: u32 = 20;
const NATURAL_FUMBLE: u32 = 1;

/// Verdict of one attack roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackVerdict {
    pub raw_roll: u32,
    pub total: i32,
    pub hit: bool,
    pub critical: bool,
}

/// Roll a d20 and compare against armor class.
///
/// The raw die decides the extremes: a natural 20 always hits and is a
/// critical, a natural 1 always misses, whatever the bonus or armor class.
pub fn resolve_attack(
    attack_bonus: i32,
    armor_class: u32,
    dice: &mut dyn DiceRoller,
) -> AttackVerdict {
    let raw_roll = dice.roll(ATTACK_DIE);
    judge_attack(raw_roll, attack_bonus, armor_class)
}

/// Evaluate an already-rolled d20
pub fn judge_attack(raw_roll: u32, attack_bonus: i32, armor_class: u32) -> AttackVerdict {
    let total = (raw_roll as i32).saturating_add(attack_bonus);
    let (hit, critical) = match raw_roll {
        NATURAL_CRITICAL => (true, true),
        NATURAL_FUMBLE => (false, false),
        _ => (i64::from(total) >= i64::from(armor_class), false),
    };

    AttackVerdict {
        raw_roll,
        total,
        hit,
        critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::SequenceDiceRoller;

    #[test]
    fn test_natural_twenty_always_hits_as_critical() {
        let mut dice = SequenceDiceRoller::fixed(20);
        let verdict = resolve_attack(-10, 50, &mut dice);
        assert!(verdict.hit);
        assert!(verdict.critical);
        assert_eq!(verdict.raw_roll, 20);
        assert_eq!(verdict.total, 10);
    }

    #[test]
    fn test_natural_one_always_misses() {
        let mut dice = SequenceDiceRoller::fixed(1);
        let verdict = resolve_attack(20, 5, &mut dice);
        assert!(!verdict.hit);
        assert!(!verdict.critical);
        assert_eq!(verdict.total, 21);
    }

    #[test]
    fn test_meeting_armor_class_hits() {
        assert!(judge_attack(12, 4, 16).hit);
        assert!(!judge_attack(11, 4, 16).hit);
        assert!(!judge_attack(19, 4, 16).critical);
    }

    #[test]
    fn test_huge_bonus_saturates_instead_of_overflowing() {
        let verdict = judge_attack(15, i32::MAX, 14);
        assert_eq!(verdict.total, i32::MAX);
        assert!(verdict.hit);

        let verdict = judge_attack(15, i32::MIN, 10);
        assert_eq!(verdict.total, i32::MIN + 15);
        assert!(!verdict.hit);
    }

    #[test]
    fn test_high_total_is_not_critical() {
        // critical detection uses the raw die, not the modified total
        let verdict = judge_attack(19, 10, 12);
        assert!(verdict.hit);
        assert!(!verdict.critical);
    }
}
