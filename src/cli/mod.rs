//! Command-line interface for `statues`

pub mod args;
pub mod commands;
