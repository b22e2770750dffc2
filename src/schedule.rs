//! Pause schedule generation
//!
//! Each game session draws one schedule of freeze windows up front. An
//! event fires when the countdown reaches its `trigger_second`; because
//! the countdown descends, events generated later (larger trigger
//! seconds) fire earlier in the game.
//!
//! Triggers are matched against the countdown with `<=` through
//! [`PauseSchedule::pop_due`] rather than exact equality, so a stalled
//! tick releases a late freeze instead of silently dropping it.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::GameConfig;

/// One scheduled freeze window, immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseEvent {
    /// Countdown value (seconds remaining) at which the warning starts
    pub trigger_second: u32,
    /// Length of the freeze window, in seconds
    pub freeze_secs: u32,
}

/// The freeze windows pending for one game session, in firing order.
#[derive(Debug, Clone, Default)]
pub struct PauseSchedule {
    pending: VecDeque<PauseEvent>,
}

impl PauseSchedule {
    /// Generates a schedule for one game from the configured duration.
    ///
    /// Walks the countdown from `min_lead_in_secs`, drawing each freeze
    /// duration uniformly from the configured range and leaving
    /// `min_gap_secs` between windows, until the remaining headroom
    /// drops below `min_trailing_secs`. Durations of
    /// `min_lead_in_secs + min_trailing_secs` or less produce an empty
    /// schedule (with defaults: 15 seconds or less).
    pub fn generate(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut events = Vec::new();
        let mut current = config.min_lead_in_secs;

        while current + config.min_trailing_secs < config.game_duration_secs {
            let freeze_secs = rng.random_range(config.freeze_secs.min..=config.freeze_secs.max);
            events.push(PauseEvent {
                trigger_second: current,
                freeze_secs,
            });
            current += freeze_secs + config.min_gap_secs;
        }

        // Generation walks trigger seconds upward; the countdown walks
        // downward, so firing order is the reverse.
        events.reverse();
        Self {
            pending: events.into(),
        }
    }

    /// Pops the next event due at or before the given countdown value.
    ///
    /// At most one event per call: if a stall left several events due,
    /// they drain one per tick so freeze windows never overlap.
    pub fn pop_due(&mut self, time_remaining: u32) -> Option<PauseEvent> {
        if self
            .pending
            .front()
            .is_some_and(|event| event.trigger_second >= time_remaining)
        {
            return self.pending.pop_front();
        }
        None
    }

    /// Number of events not yet dispatched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether all events have been dispatched (or none were generated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remaining events in firing order.
    #[must_use]
    pub fn pending(&self) -> Vec<PauseEvent> {
        self.pending.iter().copied().collect()
    }
}
