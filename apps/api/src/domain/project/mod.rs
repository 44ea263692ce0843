// Project domain module
// Contains the project aggregate root and its submission lifecycle

#![allow(clippy::module_inception)]

pub mod project;
pub mod value_objects;

pub use project::{Project, ProjectUpdate};
pub use value_objects::ProjectStatus;
