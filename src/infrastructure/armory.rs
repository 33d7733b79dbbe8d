//! In-memory weapon catalog adapter

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::outbound::WeaponCatalogPort;
use crate::domain::value_objects::{DiceExpression, Weapon, WeaponRef};

/// Weapon catalog held in memory, keyed by normalized weapon reference
#[derive(Debug, Clone, Default)]
pub struct InMemoryWeaponCatalog {
    weapons: HashMap<WeaponRef, Weapon>,
}

impl InMemoryWeaponCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small armory of common weapons
    pub fn standard() -> Self {
        let entries: [(&str, &str, u32, u32, i32); 8] = [
            ("dagger", "Dagger", 1, 4, 2),
            ("shortsword", "Shortsword", 1, 6, 2),
            ("scimitar", "Scimitar", 1, 6, 2),
            ("longsword", "Longsword", 1, 8, 3),
            ("battleaxe", "Battleaxe", 1, 8, 3),
            ("greataxe", "Greataxe", 1, 12, 3),
            ("greatsword", "Greatsword", 2, 6, 3),
            ("shortbow", "Shortbow", 1, 6, 2),
        ];

        let mut catalog = Self::new();
        for (key, name, count, sides, ability) in entries {
            if let Ok(damage) = DiceExpression::new(count, sides, 0) {
                catalog.insert(key, Weapon::new(name, damage).with_ability_modifier(ability));
            }
        }
        catalog
    }

    /// Load a catalog from a JSON object of `key -> weapon`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Weapon> =
            serde_json::from_str(json).context("Invalid weapon catalog JSON")?;
        let mut catalog = Self::new();
        for (key, weapon) in raw {
            catalog.insert(key.as_str(), weapon);
        }
        Ok(catalog)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read weapon catalog {}", path.display()))?;
        let catalog = Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse weapon catalog {}", path.display()))?;
        tracing::info!(path = %path.display(), weapons = catalog.len(), "Loaded weapon catalog");
        Ok(catalog)
    }

    pub fn insert(&mut self, key: impl Into<WeaponRef>, weapon: Weapon) {
        self.weapons.insert(key.into(), weapon);
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

impl WeaponCatalogPort for InMemoryWeaponCatalog {
    fn find_weapon(&self, weapon: &WeaponRef) -> Option<Weapon> {
        self.weapons.get(weapon).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_armory() {
        let catalog = InMemoryWeaponCatalog::standard();
        assert_eq!(catalog.len(), 8);

        let longsword = catalog.find_weapon(&WeaponRef::new("Longsword")).unwrap();
        assert_eq!(longsword.damage.to_string(), "1d8");
        assert_eq!(longsword.damage_modifier(), 3);

        assert!(catalog.find_weapon(&WeaponRef::new("trebuchet")).is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            " Warhammer ": { "name": "Warhammer", "damage": "1d8", "ability_modifier": 3 },
            "sling": { "name": "Sling", "damage": "1d4+1" }
        }"#;
        let catalog = InMemoryWeaponCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);

        let hammer = catalog.find_weapon(&WeaponRef::new("warhammer")).unwrap();
        assert_eq!(hammer.damage_modifier(), 3);

        let sling = catalog.find_weapon(&WeaponRef::new("sling")).unwrap();
        assert_eq!(sling.attack_bonus, 0);
        assert_eq!(sling.damage_modifier(), 1);
    }

    #[test]
    fn test_catalog_weapon_with_extreme_modifier_resolves() {
        use crate::domain::services::{calculate_damage, resolve_attack, SequenceDiceRoller};

        let json = r#"{ "runeblade": { "name": "Runeblade", "damage": "1d8+5", "ability_modifier": 2147483647 } }"#;
        let catalog = InMemoryWeaponCatalog::from_json_str(json).unwrap();
        let weapon = catalog.find_weapon(&WeaponRef::new("runeblade")).unwrap();

        let mut dice = SequenceDiceRoller::fixed(12);
        let verdict = resolve_attack(weapon.total_attack_bonus(), 14, &mut dice);
        assert!(verdict.hit);
        let damage = calculate_damage(
            &weapon.damage,
            weapon.damage_modifier(),
            verdict.critical,
            &mut dice,
        );
        assert_eq!(damage.total, i32::MAX as u32);
    }

    #[test]
    fn test_from_json_rejects_bad_dice() {
        let json = r#"{ "club": { "name": "Club", "damage": "1d0" } }"#;
        assert!(InMemoryWeaponCatalog::from_json_str(json).is_err());
    }
}
