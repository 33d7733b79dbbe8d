//! Combat Encounter Aggregate - Root of one fight from initiative to outcome
//!
//! The encounter exclusively owns its combatants in an arena (`Vec`) and
//! refers to them by [`CombatantId`] everywhere else: the turn order, the AI
//! snapshots and the attack history. Every action is validated in full before
//! the first mutation, so a rejected action leaves the encounter untouched.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    AttackRecord, Combatant, CombatantStatus, Side, MAX_DEXTERITY_MODIFIER, MIN_ARMOR_CLASS,
    MIN_DEXTERITY_MODIFIER,
};
use crate::domain::services::{
    calculate_damage, decide_action, resolve_attack, roll_initiative, AiDecision, DiceRoller,
    InitiativeEntry,
};
use crate::domain::value_objects::{CombatAction, CombatantId, EncounterId, Weapon, WeaponRef};

/// Errors raised by encounter operations. All are detected before mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("It is not {0}'s turn")]
    NotCurrentTurn(CombatantId),

    #[error("Invalid target: {0}")]
    InvalidTarget(CombatantId),

    #[error("Combat already ended")]
    CombatAlreadyEnded,

    #[error("Unknown weapon: {0}")]
    UnknownWeapon(WeaponRef),

    #[error("Combat has not started")]
    EncounterNotStarted,

    #[error("Combat already started")]
    EncounterAlreadyStarted,

    #[error("Combatant {0} is not AI-controlled")]
    NotAiControlled(CombatantId),

    #[error("Encounter not found: {0}")]
    EncounterNotFound(EncounterId),
}

/// Encounter lifecycle; transitions only move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterStatus {
    NotStarted,
    Active,
    Completed,
}

/// Final result of a completed encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterOutcome {
    PlayerVictory,
    EnemyVictory,
    Draw,
}

impl EncounterOutcome {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PlayerVictory => "Player Victory",
            Self::EnemyVictory => "Enemy Victory",
            Self::Draw => "Draw",
        }
    }
}

/// Read-only snapshot of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterState {
    pub id: EncounterId,
    pub status: EncounterStatus,
    pub outcome: Option<EncounterOutcome>,
    pub round: u32,
    pub turn_index: usize,
    /// Combatant whose turn it is; `None` unless the encounter is active
    pub current_combatant: Option<CombatantId>,
    pub turn_order: Vec<CombatantId>,
    pub combatants: Vec<Combatant>,
    pub attacks_resolved: usize,
}

impl EncounterState {
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == EncounterStatus::Completed
    }
}

/// The Combat Encounter Aggregate Root
#[derive(Debug, Clone)]
pub struct CombatEncounter {
    id: EncounterId,
    /// Arena of participants; membership is fixed at creation
    combatants: Vec<Combatant>,
    initiative: Vec<InitiativeEntry>,
    /// Fixed once computed; inactive combatants are skipped, never removed
    turn_order: Vec<CombatantId>,
    round: u32,
    turn_index: usize,
    status: EncounterStatus,
    outcome: Option<EncounterOutcome>,
    history: Vec<AttackRecord>,
}

impl CombatEncounter {
    /// Create an encounter from a roster.
    ///
    /// # Invariants
    /// - At least one active combatant on each side
    /// - Every combatant has `0 < current_health <= max_health`, armor
    ///   class >= 10 and a dexterity modifier within -5..=5
    /// - Combatant ids are unique
    pub fn new(roster: Vec<Combatant>) -> Result<Self, CombatError> {
        Self::validate_roster(&roster)?;
        Ok(Self {
            id: EncounterId::new(),
            combatants: roster,
            initiative: Vec::new(),
            turn_order: Vec::new(),
            round: 1,
            turn_index: 0,
            status: EncounterStatus::NotStarted,
            outcome: None,
            history: Vec::new(),
        })
    }

    pub fn with_id(mut self, id: EncounterId) -> Self {
        self.id = id;
        self
    }

    fn validate_roster(roster: &[Combatant]) -> Result<(), CombatError> {
        if roster.is_empty() {
            return Err(CombatError::InvalidRoster("Roster is empty".to_string()));
        }

        for (i, combatant) in roster.iter().enumerate() {
            if combatant.max_health() == 0 {
                return Err(CombatError::InvalidRoster(format!(
                    "{} has no maximum health",
                    combatant.name
                )));
            }
            if !combatant.is_active() {
                return Err(CombatError::InvalidRoster(format!(
                    "{} cannot enter combat while not active",
                    combatant.name
                )));
            }
            // Deserialized combatants bypass the builders, so health is re-checked here
            if combatant.current_health() == 0 || combatant.current_health() > combatant.max_health()
            {
                return Err(CombatError::InvalidRoster(format!(
                    "{} has health {}/{}",
                    combatant.name,
                    combatant.current_health(),
                    combatant.max_health()
                )));
            }
            if !(MIN_DEXTERITY_MODIFIER..=MAX_DEXTERITY_MODIFIER)
                .contains(&combatant.dexterity_modifier())
            {
                return Err(CombatError::InvalidRoster(format!(
                    "{} has dexterity modifier {} (allowed {} to {})",
                    combatant.name,
                    combatant.dexterity_modifier(),
                    MIN_DEXTERITY_MODIFIER,
                    MAX_DEXTERITY_MODIFIER
                )));
            }
            if let Some(profile) = combatant.enemy_profile() {
                if !(0.0..=1.0).contains(&profile.flee_threshold) {
                    return Err(CombatError::InvalidRoster(format!(
                        "{} has flee threshold {} (allowed 0.0 to 1.0)",
                        combatant.name, profile.flee_threshold
                    )));
                }
            }
            if combatant.armor_class < MIN_ARMOR_CLASS {
                return Err(CombatError::InvalidRoster(format!(
                    "{} has armor class {} (minimum {})",
                    combatant.name, combatant.armor_class, MIN_ARMOR_CLASS
                )));
            }
            if roster[..i].iter().any(|c| c.id == combatant.id) {
                return Err(CombatError::InvalidRoster(format!(
                    "Duplicate combatant id {}",
                    combatant.id
                )));
            }
        }

        for side in [Side::Party, Side::Enemies] {
            if !roster.iter().any(|c| c.side() == side && c.is_active()) {
                let label = match side {
                    Side::Party => "player characters",
                    Side::Enemies => "enemies",
                };
                return Err(CombatError::InvalidRoster(format!(
                    "Roster needs at least one of each side; no active {}",
                    label
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> EncounterId {
        self.id
    }

    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        self.outcome
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn turn_order(&self) -> &[CombatantId] {
        &self.turn_order
    }

    pub fn initiative(&self) -> &[InitiativeEntry] {
        &self.initiative
    }

    /// Chronological attack history
    pub fn history(&self) -> &[AttackRecord] {
        &self.history
    }

    pub fn find_combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    /// The combatant whose turn it is, while the encounter is active
    pub fn current_combatant(&self) -> Option<&Combatant> {
        if self.status != EncounterStatus::Active {
            return None;
        }
        self.turn_order
            .get(self.turn_index)
            .and_then(|id| self.find_combatant(*id))
    }

    pub fn state(&self) -> EncounterState {
        EncounterState {
            id: self.id,
            status: self.status,
            outcome: self.outcome,
            round: self.round,
            turn_index: self.turn_index,
            current_combatant: self.current_combatant().map(|c| c.id),
            turn_order: self.turn_order.clone(),
            combatants: self.combatants.clone(),
            attacks_resolved: self.history.len(),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Roll initiative and begin round 1. Allowed once.
    pub fn start(&mut self, dice: &mut dyn DiceRoller) -> Result<(), CombatError> {
        match self.status {
            EncounterStatus::NotStarted => {}
            EncounterStatus::Active => return Err(CombatError::EncounterAlreadyStarted),
            EncounterStatus::Completed => return Err(CombatError::CombatAlreadyEnded),
        }

        let entries = roll_initiative(&self.combatants, dice);
        for entry in &entries {
            if let Some(idx) = self.index_of(entry.combatant_id) {
                self.combatants[idx].set_initiative(entry.score);
            }
        }

        self.turn_order = entries.iter().map(|e| e.combatant_id).collect();
        self.initiative = entries;
        self.round = 1;
        self.turn_index = 0;
        self.status = EncounterStatus::Active;
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), CombatError> {
        match self.status {
            EncounterStatus::Active => Ok(()),
            EncounterStatus::NotStarted => Err(CombatError::EncounterNotStarted),
            EncounterStatus::Completed => Err(CombatError::CombatAlreadyEnded),
        }
    }

    /// Resolve one action for the combatant whose turn it is.
    ///
    /// `weapon` is the acting combatant's resolved weapon; it is required for
    /// attacks and ignored otherwise. Returns the attack record, if any.
    pub fn resolve_turn(
        &mut self,
        actor_id: CombatantId,
        action: CombatAction,
        weapon: Option<&Weapon>,
        dice: &mut dyn DiceRoller,
    ) -> Result<Option<AttackRecord>, CombatError> {
        let actor_idx = self.validate_action(actor_id, &action, weapon)?;
        Ok(self.apply_action(actor_idx, action, weapon, dice))
    }

    /// Evaluate the AI for the current enemy without changing anything.
    pub fn next_ai_decision(&self) -> Result<AiDecision, CombatError> {
        self.ensure_active()?;
        let actor = self
            .current_combatant()
            .ok_or(CombatError::EncounterNotStarted)?;
        decide_action(actor, &self.combatants).ok_or(CombatError::NotAiControlled(actor.id))
    }

    /// Let the AI choose and resolve the current enemy's turn.
    ///
    /// The evaluated behavior state is stored on the enemy as part of the
    /// same step as the action itself.
    pub fn resolve_ai_turn(
        &mut self,
        weapon: Option<&Weapon>,
        dice: &mut dyn DiceRoller,
    ) -> Result<(AiDecision, Option<AttackRecord>), CombatError> {
        self.ensure_active()?;
        if let Some(outcome) = self.evaluate_outcome() {
            self.complete(outcome);
            return Err(CombatError::CombatAlreadyEnded);
        }

        let decision = self.next_ai_decision()?;
        let actor_id = self.turn_order[self.turn_index];
        let actor_idx = self.validate_action(actor_id, &decision.action, weapon)?;

        self.combatants[actor_idx].set_behavior(decision.behavior);
        let record = self.apply_action(actor_idx, decision.action, weapon, dice);
        Ok((decision, record))
    }

    fn validate_action(
        &self,
        actor_id: CombatantId,
        action: &CombatAction,
        weapon: Option<&Weapon>,
    ) -> Result<usize, CombatError> {
        self.ensure_active()?;

        let current = self
            .current_combatant()
            .filter(|c| c.id == actor_id && c.is_active())
            .ok_or(CombatError::NotCurrentTurn(actor_id))?;
        let actor_idx = self
            .index_of(current.id)
            .ok_or(CombatError::NotCurrentTurn(actor_id))?;
        let actor = &self.combatants[actor_idx];

        if let CombatAction::Attack { target } = action {
            let valid = self
                .find_combatant(*target)
                .map(|t| t.is_active() && t.side() == actor.side().opponent())
                .unwrap_or(false);
            if !valid {
                return Err(CombatError::InvalidTarget(*target));
            }
            if weapon.is_none() {
                return Err(CombatError::UnknownWeapon(actor.weapon.clone()));
            }
        }

        Ok(actor_idx)
    }

    /// Apply a validated action, then check for an outcome and advance.
    fn apply_action(
        &mut self,
        actor_idx: usize,
        action: CombatAction,
        weapon: Option<&Weapon>,
        dice: &mut dyn DiceRoller,
    ) -> Option<AttackRecord> {
        let record = match (action, weapon) {
            (CombatAction::Attack { target }, Some(weapon)) => match self.index_of(target) {
                Some(target_idx) => Some(self.perform_attack(actor_idx, target_idx, weapon, dice)),
                None => None,
            },
            (CombatAction::Flee, _) => {
                self.combatants[actor_idx].flee();
                None
            }
            _ => None,
        };

        match self.evaluate_outcome() {
            Some(outcome) => self.complete(outcome),
            None => self.advance_turn(),
        }

        record
    }

    fn perform_attack(
        &mut self,
        attacker_idx: usize,
        target_idx: usize,
        weapon: &Weapon,
        dice: &mut dyn DiceRoller,
    ) -> AttackRecord {
        let target_ac = self.combatants[target_idx].armor_class;
        let verdict = resolve_attack(weapon.total_attack_bonus(), target_ac, dice);

        let (damage_dice, damage_rolls, raw_damage, total_damage) = if verdict.hit {
            let damage = calculate_damage(
                &weapon.damage,
                weapon.damage_modifier(),
                verdict.critical,
                dice,
            );
            (damage.expression, damage.rolls, damage.raw, damage.total)
        } else {
            (
                weapon.damage.with_modifier(weapon.damage_modifier()),
                Vec::new(),
                0,
                0,
            )
        };

        let target_health_after = self.combatants[target_idx].apply_damage(total_damage);

        let record = AttackRecord {
            round: self.round,
            attacker_id: self.combatants[attacker_idx].id,
            target_id: self.combatants[target_idx].id,
            raw_roll: verdict.raw_roll,
            attack_total: verdict.total,
            target_armor_class: target_ac,
            hit: verdict.hit,
            critical: verdict.critical,
            weapon_name: weapon.name.clone(),
            damage_dice,
            damage_rolls,
            raw_damage,
            total_damage,
            target_health_after,
        };
        self.history.push(record.clone());
        record
    }

    fn side_has_active(&self, side: Side) -> bool {
        self.combatants
            .iter()
            .any(|c| c.side() == side && c.status() == CombatantStatus::Active)
    }

    /// Win condition: a side with no active member loses; both empty is a draw.
    fn evaluate_outcome(&self) -> Option<EncounterOutcome> {
        match (
            self.side_has_active(Side::Party),
            self.side_has_active(Side::Enemies),
        ) {
            (true, true) => None,
            (true, false) => Some(EncounterOutcome::PlayerVictory),
            (false, true) => Some(EncounterOutcome::EnemyVictory),
            (false, false) => Some(EncounterOutcome::Draw),
        }
    }

    fn complete(&mut self, outcome: EncounterOutcome) {
        self.status = EncounterStatus::Completed;
        self.outcome = Some(outcome);
    }

    /// Move to the next active combatant, wrapping into a new round.
    fn advance_turn(&mut self) {
        let len = self.turn_order.len();
        for _ in 0..len {
            self.turn_index += 1;
            if self.turn_index >= len {
                self.turn_index = 0;
                self.round += 1;
            }
            let id = self.turn_order[self.turn_index];
            if self.find_combatant(id).is_some_and(|c| c.is_active()) {
                return;
            }
        }
    }
}
