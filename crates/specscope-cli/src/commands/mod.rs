//! CLI command implementations.

pub mod common;
pub mod config;
pub mod file;
pub mod table;
pub mod tone;
