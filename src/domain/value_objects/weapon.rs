//! Weapon data consumed by the attack and damage pipeline

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DiceExpression;

/// Catalog key identifying an equipped weapon (e.g. `"longsword"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponRef(String);

impl WeaponRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeaponRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeaponRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Resolved weapon statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Damage dice; any constant in the expression is part of the flat modifier
    pub damage: DiceExpression,
    /// Ability modifier (STR or DEX) applied to both attack and damage
    #[serde(default)]
    pub ability_modifier: i32,
    /// Flat bonus to the attack roll only (magic weapons, proficiency)
    #[serde(default)]
    pub attack_bonus: i32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage: DiceExpression) -> Self {
        Self {
            name: name.into(),
            damage,
            ability_modifier: 0,
            attack_bonus: 0,
        }
    }

    pub fn with_ability_modifier(mut self, modifier: i32) -> Self {
        self.ability_modifier = modifier;
        self
    }

    pub fn with_attack_bonus(mut self, bonus: i32) -> Self {
        self.attack_bonus = bonus;
        self
    }

    /// Total bonus added to the d20 attack roll
    pub fn total_attack_bonus(&self) -> i32 {
        self.ability_modifier.saturating_add(self.attack_bonus)
    }

    /// Flat amount added once to the damage dice
    pub fn damage_modifier(&self) -> i32 {
        self.damage.modifier.saturating_add(self.ability_modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_ref_is_normalized() {
        assert_eq!(WeaponRef::new("  LongSword "), WeaponRef::from("longsword"));
    }

    #[test]
    fn test_bonuses() {
        let weapon = Weapon::new("Longsword", "1d8+1".parse().unwrap())
            .with_ability_modifier(3)
            .with_attack_bonus(2);
        assert_eq!(weapon.total_attack_bonus(), 5);
        assert_eq!(weapon.damage_modifier(), 4);
    }

    #[test]
    fn test_extreme_modifiers_saturate() {
        let weapon: Weapon = serde_json::from_str(
            r#"{"name": "Godslayer", "damage": "1d8+5", "ability_modifier": 2147483647, "attack_bonus": 9}"#,
        )
        .unwrap();
        assert_eq!(weapon.total_attack_bonus(), i32::MAX);
        assert_eq!(weapon.damage_modifier(), i32::MAX);

        let cursed = Weapon::new("Cursed Blade", "1d4-3".parse().unwrap())
            .with_ability_modifier(i32::MIN)
            .with_attack_bonus(-1);
        assert_eq!(cursed.total_attack_bonus(), i32::MIN);
        assert_eq!(cursed.damage_modifier(), i32::MIN);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let weapon: Weapon =
            serde_json::from_str(r#"{"name": "Dagger", "damage": "1d4"}"#).unwrap();
        assert_eq!(weapon.ability_modifier, 0);
        assert_eq!(weapon.attack_bonus, 0);
        assert_eq!(weapon.damage.sides, 4);
    }
}
