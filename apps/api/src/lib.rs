//! Hackathon API Library
//!
//! This library provides the core functionality for the hackathon platform
//! API: domain logic, document storage, external integrations and the HTTP
//! layer that ties them together.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod prompts;
pub mod state;
