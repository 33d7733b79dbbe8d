//! Application services - Use case implementations
//!
//! Each service follows hexagonal architecture principles, accepting port
//! dependencies and returning domain types.

pub mod combat_service;

// Re-export combat service types
pub use combat_service::{
    CombatService, CombatServiceImpl, ResolveTurnRequest, StartCombatRequest, TurnResolution,
};
