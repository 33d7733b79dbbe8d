//! Application layer - Use cases orchestrating the combat domain

pub mod ports;
pub mod services;
