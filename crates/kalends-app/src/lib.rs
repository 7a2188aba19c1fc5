//! Command-line front end for kalends.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
