//! Aggregates - Consistency boundaries for combat state

mod combat_encounter;

pub use combat_encounter::{
    CombatEncounter, CombatError, EncounterOutcome, EncounterState, EncounterStatus,
};
