//! Combat Service - Application service exposing encounter use cases
//!
//! Live encounters are kept in a registry keyed by [`EncounterId`]. Each
//! entry owns its encounter and its own dice roller behind a mutex, which
//! serializes turn submission per encounter while separate encounters run
//! independently.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{DiceRollerFactory, WeaponCatalogPort};
use crate::domain::aggregates::{CombatEncounter, CombatError, EncounterState};
use crate::domain::entities::{AttackRecord, Combatant};
use crate::domain::services::{AiDecision, DiceRoller};
use crate::domain::value_objects::{CombatAction, CombatantId, EncounterId};

/// Request to start a new encounter
#[derive(Debug, Clone)]
pub struct StartCombatRequest {
    pub roster: Vec<Combatant>,
    /// Seed for the encounter's dice; `None` for fresh randomness
    pub seed: Option<u64>,
}

/// Request to resolve the current combatant's turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResolveTurnRequest {
    pub combatant_id: CombatantId,
    pub action: CombatAction,
}

/// Result of one resolved turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResolution {
    pub record: Option<AttackRecord>,
    /// Present when the AI chose the action
    pub ai_decision: Option<AiDecision>,
    pub state: EncounterState,
}

/// Combat service trait defining the application use cases
#[async_trait]
pub trait CombatService: Send + Sync {
    /// Validate the roster, roll initiative and begin round 1
    async fn start_combat(&self, request: StartCombatRequest)
        -> Result<EncounterState, CombatError>;

    /// Resolve an action submitted for the current combatant
    async fn resolve_turn(
        &self,
        encounter_id: EncounterId,
        request: ResolveTurnRequest,
    ) -> Result<TurnResolution, CombatError>;

    /// Let the AI act for the current enemy
    async fn resolve_ai_turn(&self, encounter_id: EncounterId)
        -> Result<TurnResolution, CombatError>;

    /// Read-only snapshot of an encounter
    async fn get_state(&self, encounter_id: EncounterId) -> Result<EncounterState, CombatError>;

    /// Chronological attack history of an encounter
    async fn get_history(&self, encounter_id: EncounterId)
        -> Result<Vec<AttackRecord>, CombatError>;

    /// Discard an encounter and its combatants, returning the final snapshot
    async fn close_encounter(&self, encounter_id: EncounterId)
        -> Result<EncounterState, CombatError>;
}

/// An encounter together with the dice roller it exclusively uses
struct EncounterSlot {
    encounter: CombatEncounter,
    dice: Box<dyn DiceRoller>,
}

/// Default implementation of CombatService with an in-memory registry
pub struct CombatServiceImpl<W: WeaponCatalogPort, D: DiceRollerFactory> {
    encounters: RwLock<HashMap<EncounterId, Arc<Mutex<EncounterSlot>>>>,
    weapons: Arc<W>,
    dice_factory: Arc<D>,
}

impl<W, D> CombatServiceImpl<W, D>
where
    W: WeaponCatalogPort,
    D: DiceRollerFactory,
{
    pub fn new(weapons: Arc<W>, dice_factory: Arc<D>) -> Self {
        Self {
            encounters: RwLock::new(HashMap::new()),
            weapons,
            dice_factory,
        }
    }

    /// Number of encounters currently held
    pub async fn active_encounters(&self) -> usize {
        self.encounters.read().await.len()
    }

    async fn slot(&self, encounter_id: EncounterId) -> Result<Arc<Mutex<EncounterSlot>>, CombatError> {
        self.encounters
            .read()
            .await
            .get(&encounter_id)
            .cloned()
            .ok_or(CombatError::EncounterNotFound(encounter_id))
    }

    fn log_resolution(encounter_id: EncounterId, resolution: &TurnResolution) {
        if let Some(record) = &resolution.record {
            debug!(
                encounter_id = %encounter_id,
                attacker = %record.attacker_id,
                target = %record.target_id,
                raw_roll = record.raw_roll,
                hit = record.hit,
                critical = record.critical,
                damage = record.total_damage,
                "{}",
                record.summary()
            );
        }
        if let Some(outcome) = resolution.state.outcome {
            info!(
                encounter_id = %encounter_id,
                round = resolution.state.round,
                "Encounter completed: {}",
                outcome.display_name()
            );
        }
    }
}

#[async_trait]
impl<W, D> CombatService for CombatServiceImpl<W, D>
where
    W: WeaponCatalogPort + 'static,
    D: DiceRollerFactory + 'static,
{
    #[instrument(skip(self, request), fields(roster_size = request.roster.len(), seed = ?request.seed))]
    async fn start_combat(
        &self,
        request: StartCombatRequest,
    ) -> Result<EncounterState, CombatError> {
        for combatant in &request.roster {
            if self.weapons.find_weapon(&combatant.weapon).is_none() {
                warn!(
                    combatant = %combatant.name,
                    weapon = %combatant.weapon,
                    "Combatant has an unknown weapon; its attacks will be rejected"
                );
            }
        }

        let mut encounter = CombatEncounter::new(request.roster).map_err(|e| {
            warn!(error = %e, "Rejected roster");
            e
        })?;
        let mut dice = self.dice_factory.create(request.seed);
        encounter.start(dice.as_mut())?;

        let state = encounter.state();
        info!(
            encounter_id = %state.id,
            combatants = state.combatants.len(),
            "Started encounter"
        );

        self.encounters.write().await.insert(
            state.id,
            Arc::new(Mutex::new(EncounterSlot { encounter, dice })),
        );
        Ok(state)
    }

    #[instrument(skip(self), fields(encounter_id = %encounter_id, combatant_id = %request.combatant_id, action = request.action.display_name()))]
    async fn resolve_turn(
        &self,
        encounter_id: EncounterId,
        request: ResolveTurnRequest,
    ) -> Result<TurnResolution, CombatError> {
        let slot = self.slot(encounter_id).await?;
        let mut guard = slot.lock().await;
        let EncounterSlot { encounter, dice } = &mut *guard;

        let weapon = match request.action {
            CombatAction::Attack { .. } => encounter
                .find_combatant(request.combatant_id)
                .and_then(|c| self.weapons.find_weapon(&c.weapon)),
            CombatAction::Flee | CombatAction::Pass => None,
        };

        let record = encounter
            .resolve_turn(
                request.combatant_id,
                request.action,
                weapon.as_ref(),
                dice.as_mut(),
            )
            .map_err(|e| {
                debug!(error = %e, "Rejected action");
                e
            })?;

        let resolution = TurnResolution {
            record,
            ai_decision: None,
            state: encounter.state(),
        };
        Self::log_resolution(encounter_id, &resolution);
        Ok(resolution)
    }

    #[instrument(skip(self), fields(encounter_id = %encounter_id))]
    async fn resolve_ai_turn(
        &self,
        encounter_id: EncounterId,
    ) -> Result<TurnResolution, CombatError> {
        let slot = self.slot(encounter_id).await?;
        let mut guard = slot.lock().await;
        let EncounterSlot { encounter, dice } = &mut *guard;

        let weapon = encounter
            .current_combatant()
            .and_then(|c| self.weapons.find_weapon(&c.weapon));

        let (decision, record) = encounter.resolve_ai_turn(weapon.as_ref(), dice.as_mut())?;
        debug!(
            behavior = decision.behavior.display_name(),
            action = decision.action.display_name(),
            "AI acted"
        );

        let resolution = TurnResolution {
            record,
            ai_decision: Some(decision),
            state: encounter.state(),
        };
        Self::log_resolution(encounter_id, &resolution);
        Ok(resolution)
    }

    #[instrument(skip(self))]
    async fn get_state(&self, encounter_id: EncounterId) -> Result<EncounterState, CombatError> {
        let slot = self.slot(encounter_id).await?;
        let guard = slot.lock().await;
        Ok(guard.encounter.state())
    }

    #[instrument(skip(self))]
    async fn get_history(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Vec<AttackRecord>, CombatError> {
        let slot = self.slot(encounter_id).await?;
        let guard = slot.lock().await;
        Ok(guard.encounter.history().to_vec())
    }

    #[instrument(skip(self))]
    async fn close_encounter(
        &self,
        encounter_id: EncounterId,
    ) -> Result<EncounterState, CombatError> {
        let slot = self
            .encounters
            .write()
            .await
            .remove(&encounter_id)
            .ok_or(CombatError::EncounterNotFound(encounter_id))?;
        let state = slot.lock().await.encounter.state();
        info!(encounter_id = %encounter_id, status = ?state.status, "Closed encounter");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{EncounterOutcome, EncounterStatus};
    use crate::domain::entities::{BehaviorState, CombatantStatus};
    use crate::domain::services::SequenceDiceRoller;
    use crate::domain::value_objects::{Weapon, WeaponRef};

    struct TestArmory(HashMap<WeaponRef, Weapon>);

    impl TestArmory {
        fn new() -> Self {
            let mut weapons = HashMap::new();
            weapons.insert(
                WeaponRef::new("longsword"),
                Weapon::new("Longsword", "1d8".parse().unwrap()).with_ability_modifier(3),
            );
            weapons.insert(
                WeaponRef::new("scimitar"),
                Weapon::new("Scimitar", "1d6".parse().unwrap()).with_ability_modifier(2),
            );
            Self(weapons)
        }
    }

    impl WeaponCatalogPort for TestArmory {
        fn find_weapon(&self, weapon: &WeaponRef) -> Option<Weapon> {
            self.0.get(weapon).cloned()
        }
    }

    struct ScriptedDice(Vec<u32>);

    impl DiceRollerFactory for ScriptedDice {
        fn create(&self, _seed: Option<u64>) -> Box<dyn DiceRoller> {
            Box::new(SequenceDiceRoller::new(self.0.clone()))
        }
    }

    fn service(script: Vec<u32>) -> CombatServiceImpl<TestArmory, ScriptedDice> {
        CombatServiceImpl::new(Arc::new(TestArmory::new()), Arc::new(ScriptedDice(script)))
    }

    fn duel() -> (Combatant, Combatant) {
        (
            Combatant::player("Aria", 30, 16, "longsword"),
            Combatant::enemy("Orc", 20, 14, "scimitar").with_flee_threshold(0.25),
        )
    }

    #[tokio::test]
    async fn test_start_combat_rejects_one_sided_roster() {
        let service = service(vec![10]);
        let (hero, _) = duel();
        let result = service
            .start_combat(StartCombatRequest {
                roster: vec![hero],
                seed: None,
            })
            .await;
        assert!(matches!(result, Err(CombatError::InvalidRoster(_))));
        assert_eq!(service.active_encounters().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_encounter() {
        let service = service(vec![10]);
        let missing = EncounterId::new();
        assert_eq!(
            service.get_state(missing).await,
            Err(CombatError::EncounterNotFound(missing))
        );
        assert_eq!(
            service.close_encounter(missing).await,
            Err(CombatError::EncounterNotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_enemy_flees_and_players_win() {
        let script = vec![
            15, 5, // initiative: Aria 15, Orc 5
            15, 8, // Aria hits for 8 + 3 -> Orc 9
            1, // Orc misses
            15, 1, // Aria hits for 1 + 3 -> Orc 5 (25%)
            1, // Orc, still defensive, misses
            15, 1, // Aria hits for 4 -> Orc 1
        ];
        let service = service(script);
        let (hero, orc) = duel();
        let (hero_id, orc_id) = (hero.id, orc.id);

        let state = service
            .start_combat(StartCombatRequest {
                roster: vec![hero, orc],
                seed: Some(7),
            })
            .await
            .unwrap();
        let encounter_id = state.id;
        assert_eq!(state.current_combatant, Some(hero_id));

        let attack = ResolveTurnRequest {
            combatant_id: hero_id,
            action: CombatAction::attack(orc_id),
        };

        let resolution = service.resolve_turn(encounter_id, attack).await.unwrap();
        assert_eq!(resolution.record.unwrap().target_health_after, 9);

        let resolution = service.resolve_ai_turn(encounter_id).await.unwrap();
        assert_eq!(
            resolution.ai_decision.unwrap().behavior,
            BehaviorState::Defensive
        );
        assert!(!resolution.record.unwrap().hit);

        service.resolve_turn(encounter_id, attack).await.unwrap();
        let state = service.get_state(encounter_id).await.unwrap();
        assert_eq!(state.combatant(orc_id).unwrap().current_health(), 5);

        let resolution = service.resolve_ai_turn(encounter_id).await.unwrap();
        let decision = resolution.ai_decision.unwrap();
        assert_eq!(decision.behavior, BehaviorState::Defensive);
        assert_eq!(decision.action, CombatAction::attack(hero_id));

        service.resolve_turn(encounter_id, attack).await.unwrap();

        let resolution = service.resolve_ai_turn(encounter_id).await.unwrap();
        let decision = resolution.ai_decision.unwrap();
        assert_eq!(decision.behavior, BehaviorState::Fleeing);
        assert_eq!(decision.action, CombatAction::Flee);

        let state = service.get_state(encounter_id).await.unwrap();
        assert_eq!(state.status, EncounterStatus::Completed);
        assert_eq!(state.outcome, Some(EncounterOutcome::PlayerVictory));
        assert_eq!(
            state.combatant(orc_id).unwrap().status(),
            CombatantStatus::Fled
        );

        let history = service.get_history(encounter_id).await.unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].attacker_id, hero_id);
        assert_eq!(history[1].attacker_id, orc_id);

        assert_eq!(
            service.resolve_turn(encounter_id, attack).await,
            Err(CombatError::CombatAlreadyEnded)
        );
    }

    #[tokio::test]
    async fn test_unknown_weapon_halts_turn_only() {
        let service = service(vec![15, 5, 12]);
        let (hero, orc) = duel();
        let hero = Combatant::player("Aria", 30, 16, "vorpal blade").with_id(hero.id);
        let (hero_id, orc_id) = (hero.id, orc.id);

        let state = service
            .start_combat(StartCombatRequest {
                roster: vec![hero, orc],
                seed: None,
            })
            .await
            .unwrap();

        let result = service
            .resolve_turn(
                state.id,
                ResolveTurnRequest {
                    combatant_id: hero_id,
                    action: CombatAction::attack(orc_id),
                },
            )
            .await;
        assert_eq!(
            result,
            Err(CombatError::UnknownWeapon(WeaponRef::new("vorpal blade")))
        );
        assert_eq!(service.get_state(state.id).await.unwrap(), state);

        // the encounter stays usable
        let resolution = service
            .resolve_turn(
                state.id,
                ResolveTurnRequest {
                    combatant_id: hero_id,
                    action: CombatAction::Pass,
                },
            )
            .await
            .unwrap();
        assert_eq!(resolution.state.current_combatant, Some(orc_id));
    }

    #[tokio::test]
    async fn test_wrong_actor_is_rejected() {
        let service = service(vec![15, 5]);
        let (hero, orc) = duel();
        let orc_id = orc.id;
        let state = service
            .start_combat(StartCombatRequest {
                roster: vec![hero, orc],
                seed: None,
            })
            .await
            .unwrap();

        let result = service
            .resolve_turn(
                state.id,
                ResolveTurnRequest {
                    combatant_id: orc_id,
                    action: CombatAction::Flee,
                },
            )
            .await;
        assert_eq!(result, Err(CombatError::NotCurrentTurn(orc_id)));
        assert_eq!(
            service.resolve_ai_turn(state.id).await.map(|_| ()),
            Err(CombatError::NotAiControlled(state.current_combatant.unwrap()))
        );
    }

    #[tokio::test]
    async fn test_encounters_run_independently() {
        let service = Arc::new(service(vec![15, 5, 2]));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let (hero, orc) = duel();
                let hero_id = hero.id;
                let state = service
                    .start_combat(StartCombatRequest {
                        roster: vec![hero, orc],
                        seed: None,
                    })
                    .await
                    .unwrap();
                service
                    .resolve_turn(
                        state.id,
                        ResolveTurnRequest {
                            combatant_id: hero_id,
                            action: CombatAction::Flee,
                        },
                    )
                    .await
                    .unwrap()
                    .state
            }));
        }

        for handle in handles {
            let state = handle.await.unwrap();
            assert_eq!(state.outcome, Some(EncounterOutcome::EnemyVictory));
        }
        assert_eq!(service.active_encounters().await, 4);
    }

    #[tokio::test]
    async fn test_close_encounter_discards_it() {
        let service = service(vec![15, 5]);
        let (hero, orc) = duel();
        let state = service
            .start_combat(StartCombatRequest {
                roster: vec![hero, orc],
                seed: None,
            })
            .await
            .unwrap();

        let closed = service.close_encounter(state.id).await.unwrap();
        assert_eq!(closed.id, state.id);
        assert_eq!(service.active_encounters().await, 0);
        assert_eq!(
            service.get_history(state.id).await,
            Err(CombatError::EncounterNotFound(state.id))
        );
    }
}
