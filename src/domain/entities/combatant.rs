//! Combatant entity - A participant in a single combat encounter

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CombatantId, WeaponRef};

/// Default health ratio below which an enemy tries to leave combat
pub const DEFAULT_FLEE_THRESHOLD: f64 = 0.25;
/// Minimum armor class a combatant may enter an encounter with
pub const MIN_ARMOR_CLASS: u32 = 10;
pub const MIN_DEXTERITY_MODIFIER: i32 = -5;
pub const MAX_DEXTERITY_MODIFIER: i32 = 5;

/// Which side of the fight a combatant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Party,
    Enemies,
}

impl Side {
    pub fn opponent(&self) -> Self {
        match self {
            Self::Party => Self::Enemies,
            Self::Enemies => Self::Party,
        }
    }
}

/// Lifecycle status of a combatant within an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantStatus {
    Active,
    Defeated,
    Fled,
}

/// Enemy behavior derived from its health ratio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    #[default]
    Aggressive,
    Defensive,
    Fleeing,
}

impl BehaviorState {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Aggressive => "Aggressive",
            Self::Defensive => "Defensive",
            Self::Fleeing => "Fleeing",
        }
    }
}

/// AI-controlled data carried only by enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Last evaluated behavior state
    pub behavior: BehaviorState,
    /// Health ratio below which the enemy flees (0.0 - 1.0)
    pub flee_threshold: f64,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            behavior: BehaviorState::Aggressive,
            flee_threshold: DEFAULT_FLEE_THRESHOLD,
        }
    }
}

/// Participant kind; only enemies carry an AI profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatantKind {
    PlayerCharacter,
    Enemy(EnemyProfile),
}

impl CombatantKind {
    pub fn side(&self) -> Side {
        match self {
            Self::PlayerCharacter => Side::Party,
            Self::Enemy(_) => Side::Enemies,
        }
    }
}

/// A participant in one encounter
///
/// Health and status are private so every mutation goes through
/// [`Combatant::apply_damage`], [`Combatant::heal`] or [`Combatant::flee`],
/// which keep `0 <= current_health <= max_health` and
/// `status == Defeated` iff `current_health == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub kind: CombatantKind,
    current_health: u32,
    max_health: u32,
    pub armor_class: u32,
    dexterity_modifier: i32,
    pub weapon: WeaponRef,
    initiative: Option<i32>,
    status: CombatantStatus,
}

impl Combatant {
    pub fn new(
        name: impl Into<String>,
        kind: CombatantKind,
        max_health: u32,
        armor_class: u32,
        weapon: impl Into<WeaponRef>,
    ) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            kind,
            current_health: max_health,
            max_health,
            armor_class,
            dexterity_modifier: 0,
            weapon: weapon.into(),
            initiative: None,
            status: if max_health == 0 {
                CombatantStatus::Defeated
            } else {
                CombatantStatus::Active
            },
        }
    }

    pub fn player(
        name: impl Into<String>,
        max_health: u32,
        armor_class: u32,
        weapon: impl Into<WeaponRef>,
    ) -> Self {
        Self::new(
            name,
            CombatantKind::PlayerCharacter,
            max_health,
            armor_class,
            weapon,
        )
    }

    pub fn enemy(
        name: impl Into<String>,
        max_health: u32,
        armor_class: u32,
        weapon: impl Into<WeaponRef>,
    ) -> Self {
        Self::new(
            name,
            CombatantKind::Enemy(EnemyProfile::default()),
            max_health,
            armor_class,
            weapon,
        )
    }

    pub fn with_id(mut self, id: CombatantId) -> Self {
        self.id = id;
        self
    }

    /// Start the encounter wounded; clamped to `[0, max_health]`
    pub fn with_current_health(mut self, health: u32) -> Self {
        self.current_health = health.min(self.max_health);
        self.status = if self.current_health == 0 {
            CombatantStatus::Defeated
        } else {
            CombatantStatus::Active
        };
        self
    }

    pub fn with_dexterity_modifier(mut self, modifier: i32) -> Self {
        self.dexterity_modifier = modifier.clamp(MIN_DEXTERITY_MODIFIER, MAX_DEXTERITY_MODIFIER);
        self
    }

    /// Set the flee threshold; ignored for player characters
    pub fn with_flee_threshold(mut self, threshold: f64) -> Self {
        if let CombatantKind::Enemy(ref mut profile) = self.kind {
            profile.flee_threshold = if threshold.is_nan() {
                DEFAULT_FLEE_THRESHOLD
            } else {
                threshold.clamp(0.0, 1.0)
            };
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn dexterity_modifier(&self) -> i32 {
        self.dexterity_modifier
    }

    pub fn initiative(&self) -> Option<i32> {
        self.initiative
    }

    pub fn status(&self) -> CombatantStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == CombatantStatus::Active
    }

    pub fn side(&self) -> Side {
        self.kind.side()
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, CombatantKind::Enemy(_))
    }

    pub fn enemy_profile(&self) -> Option<&EnemyProfile> {
        match &self.kind {
            CombatantKind::Enemy(profile) => Some(profile),
            CombatantKind::PlayerCharacter => None,
        }
    }

    pub fn behavior(&self) -> Option<BehaviorState> {
        self.enemy_profile().map(|p| p.behavior)
    }

    /// Current health as a fraction of maximum health
    pub fn health_ratio(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        f64::from(self.current_health) / f64::from(self.max_health)
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Subtract damage, clamping at zero. Reaching zero marks the combatant
    /// `Defeated` in the same step. Returns the remaining health.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.current_health = self.current_health.saturating_sub(amount);
        if self.current_health == 0 {
            self.status = CombatantStatus::Defeated;
        }
        self.current_health
    }

    /// Restore health up to the maximum. Defeated combatants stay down.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.status != CombatantStatus::Defeated {
            self.current_health = self
                .current_health
                .saturating_add(amount)
                .min(self.max_health);
        }
        self.current_health
    }

    /// Leave combat. Only active combatants can flee.
    pub fn flee(&mut self) -> bool {
        if self.is_active() {
            self.status = CombatantStatus::Fled;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_initiative(&mut self, score: i32) {
        self.initiative = Some(score);
    }

    /// Record the latest behavior evaluation; no-op for player characters
    pub(crate) fn set_behavior(&mut self, behavior: BehaviorState) {
        if let CombatantKind::Enemy(ref mut profile) = self.kind {
            profile.behavior = behavior;
        }
    }
}
