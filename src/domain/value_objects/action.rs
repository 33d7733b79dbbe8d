//! Actions a combatant can take on its turn

use serde::{Deserialize, Serialize};

use super::CombatantId;

/// One action per turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatAction {
    /// Attack an active opponent with the equipped weapon
    Attack { target: CombatantId },
    /// Leave combat; always succeeds
    Flee,
    /// Do nothing this turn
    Pass,
}

impl CombatAction {
    pub fn attack(target: CombatantId) -> Self {
        Self::Attack { target }
    }

    pub fn target(&self) -> Option<CombatantId> {
        match self {
            Self::Attack { target } => Some(*target),
            Self::Flee | Self::Pass => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Attack { .. } => "Attack",
            Self::Flee => "Flee",
            Self::Pass => "Pass",
        }
    }
}
