//! Shared helpers for the game scenario tests.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use statues::display::{DisplaySink, IndicatorColor};
use statues::pose::HeadSampler;
use statues::session::{GameSession, Phase};

/// A display sink that records every update for later assertions.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    inner: Mutex<Recorded>,
}

#[derive(Debug, Default)]
struct Recorded {
    statuses: Vec<String>,
    countdowns: Vec<u32>,
    progress: Vec<u32>,
    colors: Vec<IndicatorColor>,
}

impl RecordingDisplay {
    /// Every status line set so far, in order.
    pub fn statuses(&self) -> Vec<String> {
        self.inner.lock().unwrap().statuses.clone()
    }

    /// Highest progress value ever displayed.
    pub fn max_progress(&self) -> u32 {
        self.inner.lock().unwrap().progress.iter().copied().max().unwrap_or(0)
    }

    /// Lowest countdown value ever displayed.
    pub fn min_countdown(&self) -> Option<u32> {
        self.inner.lock().unwrap().countdowns.iter().copied().min()
    }

    /// Whether the given status line was ever shown.
    pub fn saw_status(&self, text: &str) -> bool {
        self.inner.lock().unwrap().statuses.iter().any(|s| s == text)
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_status_text(&self, text: &str) {
        self.inner.lock().unwrap().statuses.push(text.to_string());
    }

    fn set_countdown_text(&self, text: &str) {
        if let Ok(value) = text.parse() {
            self.inner.lock().unwrap().countdowns.push(value);
        }
    }

    fn set_progress_value(&self, value: u32) {
        self.inner.lock().unwrap().progress.push(value);
    }

    fn set_indicator_color(&self, color: IndicatorColor) {
        self.inner.lock().unwrap().colors.push(color);
    }
}

/// Polls the session until it reaches `want`, giving up after `budget`
/// of (virtual) time. Returns whether the phase was reached.
pub async fn wait_for_phase<S, D>(
    session: &GameSession<S, D>,
    want: Phase,
    budget: Duration,
) -> bool
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    // An interval that does not divide the timer or sampler cadences,
    // so polls rarely land on the same instant as a game event.
    let poll = Duration::from_millis(47);
    let mut waited = Duration::ZERO;
    while waited <= budget {
        if session.snapshot().phase == want {
            return true;
        }
        tokio::time::sleep(poll).await;
        waited += poll;
    }
    false
}
