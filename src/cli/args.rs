//! CLI argument definitions
//!
//! All Clap derive structs for `statues` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Motion-gated freeze game: move to score, freeze on command.
#[derive(Parser, Debug)]
#[command(name = "statues", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "STATUES_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormatChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a game against a scripted motion source.
    Run(RunArgs),

    /// Validate a configuration file without starting a game.
    Validate(ValidateArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the game configuration YAML (defaults apply if omitted).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Motion script: one frame per line, `x,y` or `none`.
    #[arg(short, long, value_name = "FILE")]
    pub script: PathBuf,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the game configuration YAML.
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,
}

// ============================================================================
// Value Enums
// ============================================================================

/// Color output control for the CLI.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log format selection for the CLI.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormatChoice {
    /// Human-readable logs on stderr.
    #[default]
    Human,
    /// Newline-delimited JSON logs on stderr.
    Json,
}
