//! Outbound ports - Interfaces that the application requires from external systems

mod combat_port;

pub use combat_port::{DiceRollerFactory, WeaponCatalogPort};
