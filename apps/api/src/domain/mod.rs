// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod analytics;
pub mod cluster;
pub mod errors;
pub mod event;
pub mod forms;
pub mod judging;
pub mod nullable;
pub mod partner;
pub mod placeholders;
pub mod project;
pub mod repositories;
pub mod team;
pub mod template;
pub mod user;

pub use errors::{DomainError, DomainResult};
