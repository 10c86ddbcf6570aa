//! Application services: use-case orchestration over the port traits.

pub mod config_service;
pub mod inventory;
pub mod probe;
pub mod readiness;
pub mod session;
