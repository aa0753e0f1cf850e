//! Domain layer: commands and outcomes.

pub mod commands;
pub mod outcome;
