// Event domain module
// Contains the event aggregate root, its status lifecycle and registrations

#![allow(clippy::module_inception)]

pub mod event;
pub mod participant;
pub mod value_objects;

pub use event::{Event, EventUpdate, NewEvent};
pub use participant::Participant;
pub use value_objects::{slugify, unique_slug, EventStatus};
