//! Command-line surface: flags, prompts and command handlers

pub mod build;
pub mod cache;
pub mod commands;
pub mod completions;
pub mod prompt;
