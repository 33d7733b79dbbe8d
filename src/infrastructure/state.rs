//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::services::CombatServiceImpl;
use crate::infrastructure::armory::InMemoryWeaponCatalog;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::dice::RandomDiceFactory;

pub type CombatServiceHandle = CombatServiceImpl<InMemoryWeaponCatalog, RandomDiceFactory>;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub weapons: Arc<InMemoryWeaponCatalog>,
    pub combat_service: CombatServiceHandle,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let weapons = match &config.weapon_catalog_path {
            Some(path) => InMemoryWeaponCatalog::from_json_file(path)?,
            None => InMemoryWeaponCatalog::standard(),
        };
        let weapons = Arc::new(weapons);
        let dice_factory = Arc::new(RandomDiceFactory::new(config.dice_seed));

        let combat_service = CombatServiceImpl::new(weapons.clone(), dice_factory);

        Ok(Self {
            config,
            weapons,
            combat_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::WeaponCatalogPort;
    use crate::application::services::{CombatService, StartCombatRequest};
    use crate::domain::entities::Combatant;
    use crate::domain::value_objects::WeaponRef;

    #[tokio::test]
    async fn test_default_state_shares_standard_armory() {
        let state = AppState::new(AppConfig {
            dice_seed: Some(3),
            ..AppConfig::default()
        })
        .unwrap();

        assert_eq!(state.weapons.len(), 8);
        assert!(state.weapons.find_weapon(&WeaponRef::new("greataxe")).is_some());

        let encounter = state
            .combat_service
            .start_combat(StartCombatRequest {
                roster: vec![
                    Combatant::player("Aria", 30, 16, "longsword"),
                    Combatant::enemy("Orc", 20, 14, "greataxe"),
                ],
                seed: None,
            })
            .await
            .unwrap();
        assert_eq!(encounter.turn_order.len(), 2);
        assert_eq!(state.combat_service.active_encounters().await, 1);
    }
}
