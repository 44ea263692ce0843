// Team domain module
// Contains the team aggregate root and its domain events

#![allow(clippy::module_inception)]

pub mod events;
pub mod team;

pub use events::TeamEvent;
pub use team::{Team, TeamUpdate};
