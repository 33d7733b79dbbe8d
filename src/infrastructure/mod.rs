//! Infrastructure layer - Adapters and implementations
//!
//! This layer contains:
//! - Armory: In-memory weapon catalog
//! - Dice: RNG-backed dice rollers
//! - Config: Application configuration
//! - State: Shared application state

pub mod armory;
pub mod config;
pub mod dice;
pub mod state;
