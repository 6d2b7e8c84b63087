//! Shared types and helpers used across the workspace crates.

pub mod types;
pub mod utils;
