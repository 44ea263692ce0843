// HTTP handlers, one module per resource

pub mod analytics;
pub mod auth;
pub mod clusters;
mod common;
pub mod events;
pub mod feedback;
pub mod judging;
pub mod partners;
pub mod projects;
pub mod registrations;
pub mod teams;
pub mod templates;
pub mod users;
