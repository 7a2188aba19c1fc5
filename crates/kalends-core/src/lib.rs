//! Shared building blocks for the kalends crates: the core error type and
//! layered configuration.

pub mod config;
pub mod error;
