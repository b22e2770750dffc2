//! Game state representation
//!
//! One mutable record per session, owned by the session controller and
//! mutated by the timer, the sampling loop, and the pause controller.
//! Guarded by a single mutex; never held across a suspension point.

use crate::pose::HeadPosition;
use crate::schedule::{PauseEvent, PauseSchedule};

/// Game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No game running
    #[default]
    Idle,
    /// Countdown running, movement scores
    Active,
    /// Freeze imminent, movement still scores
    Warning,
    /// Freeze window, movement loses
    Frozen,
    /// Terminal: lost (timeout or movement during a freeze)
    Over,
    /// Terminal: progress reached the win threshold
    Won,
}

impl Phase {
    /// Whether a game is in progress (countdown and sampling running).
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Active | Self::Warning | Self::Frozen)
    }

    /// Whether qualifying movement accrues progress in this phase.
    #[must_use]
    pub const fn accrues_progress(self) -> bool {
        matches!(self, Self::Active | Self::Warning)
    }

    /// Whether this phase ends a game.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Over | Self::Won)
    }
}

/// The shared mutable state of one game session.
#[derive(Debug, Default)]
pub struct GameState {
    /// Current phase
    pub phase: Phase,
    /// Accumulated score toward the win threshold
    pub progress: u32,
    /// Seconds left on the countdown
    pub time_remaining: u32,
    /// Most recent head sample of the current game; `None` until the
    /// first successful sample
    pub last_head_position: Option<HeadPosition>,
    /// Freeze windows not yet dispatched
    pub schedule: PauseSchedule,
}

impl GameState {
    /// Resets every field to its default and parks the state in `phase`.
    ///
    /// Used both for terminal transitions (Over/Won) and for resetting
    /// back to Idle.
    pub fn clear(&mut self, phase: Phase) {
        *self = Self {
            phase,
            ..Self::default()
        };
    }
}

/// A point-in-time copy of the observable session state.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Accumulated score
    pub progress: u32,
    /// Seconds left on the countdown
    pub time_remaining: u32,
    /// Most recent head sample, if any
    pub last_head_position: Option<HeadPosition>,
    /// Freeze windows not yet dispatched, in firing order
    pub pending_pauses: Vec<PauseEvent>,
}
