//! Command implementations

pub mod config;
pub mod template;
pub mod version;
pub mod vm;
