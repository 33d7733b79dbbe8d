//! WrldBldr Combat - Turn-based combat resolution for TTRPG encounters
//!
//! The combat engine:
//! - Rolls initiative and keeps a fixed turn order
//! - Resolves d20 attacks against armor class, with critical hits
//! - Drives enemy behavior from their remaining health
//! - Records every attack for replay and narration

pub mod application;
pub mod domain;
pub mod infrastructure;
