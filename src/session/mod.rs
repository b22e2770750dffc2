//! Game session orchestration
//!
//! [`GameSession`] owns the shared [`GameState`] and coordinates three
//! cooperating async components against it:
//!
//! - the 1 Hz countdown timer ([`timer`])
//! - the self-rescheduling motion sampling loop ([`sampler`])
//! - the warning/freeze controller dispatched per scheduled pause
//!   ([`pause`])
//!
//! Every spawned task carries a [`SessionTicket`]: the session's
//! generation number plus a per-session cancellation token. `reset()`
//! and terminal transitions bump the generation and cancel the token,
//! so any completion belonging to a superseded session (a sampling
//! result in flight, a pending warning or freeze delay) discards itself
//! before touching state.

mod pause;
mod sampler;
pub mod state;
mod timer;

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::display::{DisplaySink, IndicatorColor};
use crate::error::{GameError, SessionError};
use crate::pose::{HeadPosition, HeadSampler};
use crate::schedule::PauseSchedule;

pub use state::{GameSnapshot, GameState, Phase};

/// Status line shown while movement scores.
const STATUS_MOVE: &str = "Move to fill the bar!";
/// Status line for the warning window.
const STATUS_WARNING: &str = "Freeze incoming...";
/// Status line for the freeze window.
const STATUS_FROZEN: &str = "FREEZE!";

/// One game session controller.
///
/// Generic over the head sampler and the display sink so tests and
/// embedders can substitute their own collaborators.
pub struct GameSession<S, D> {
    inner: Arc<SessionInner<S, D>>,
}

pub(crate) struct SessionInner<S, D> {
    pub(crate) config: GameConfig,
    pub(crate) sampler: S,
    pub(crate) display: D,
    pub(crate) state: Mutex<GameState>,
    /// Session generation counter; bumped on start and teardown
    epoch: AtomicU64,
    /// Cancellation token of the current session, replaced on start
    cancel: Mutex<CancellationToken>,
}

/// Identity of one session generation, carried by every spawned task.
pub(crate) struct SessionTicket<S, D> {
    pub(crate) inner: Arc<SessionInner<S, D>>,
    epoch: u64,
    pub(crate) cancel: CancellationToken,
}

impl<S, D> Clone for SessionTicket<S, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            epoch: self.epoch,
            cancel: self.cancel.clone(),
        }
    }
}

impl<S, D> SessionTicket<S, D> {
    /// Whether this ticket still names the live session.
    ///
    /// Checked at the top of every task iteration and immediately after
    /// every suspension point; a stale ticket must not touch state.
    pub(crate) fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && self.inner.epoch.load(Ordering::SeqCst) == self.epoch
    }
}

impl<S, D> GameSession<S, D>
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    /// Creates an idle session with the given collaborators.
    #[must_use]
    pub fn new(config: GameConfig, sampler: S, display: D) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                sampler,
                display,
                state: Mutex::new(GameState::default()),
                epoch: AtomicU64::new(0),
                cancel: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// Starts a new game.
    ///
    /// Runs a head-presence check against the sampler first; on failure
    /// the session stays Idle and nothing is spawned. On success the
    /// state is reset, a fresh pause schedule is generated, and the
    /// countdown timer and sampling loop are started.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyRunning`] if a game is in progress,
    /// [`SessionError::HeadNotDetected`] if the presence check fails,
    /// or a [`crate::error::SamplerError`] if sampling fails outright.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    pub async fn start(&self) -> Result<(), GameError> {
        let inner = &self.inner;

        if inner.state.lock().expect("state lock poisoned").phase.is_running() {
            return Err(SessionError::AlreadyRunning.into());
        }

        let landmarks = inner.sampler.sample(inner.config.presence_confidence).await?;
        if HeadPosition::from_landmarks(&landmarks, inner.config.presence_confidence).is_none() {
            info!("start rejected: no head detected");
            inner
                .display
                .set_status_text("No head detected. Step into view and try again.");
            return Err(SessionError::HeadNotDetected.into());
        }

        let schedule = match inner.config.schedule_seed {
            Some(seed) => {
                PauseSchedule::generate(&inner.config, &mut StdRng::seed_from_u64(seed))
            }
            None => PauseSchedule::generate(&inner.config, &mut rand::rng()),
        };
        let pauses = schedule.len();

        let ticket = {
            let mut state = inner.state.lock().expect("state lock poisoned");
            // the presence check was a suspension point; re-check
            if state.phase.is_running() {
                return Err(SessionError::AlreadyRunning.into());
            }
            state.clear(Phase::Active);
            state.time_remaining = inner.config.game_duration_secs;
            state.schedule = schedule;
            inner.issue_ticket(&self.inner)
        };

        inner.display.set_progress_value(0);
        inner
            .display
            .set_countdown_text(&inner.config.game_duration_secs.to_string());
        inner.display.set_status_text(STATUS_MOVE);
        inner.display.set_indicator_color(IndicatorColor::Green);
        info!(
            duration = inner.config.game_duration_secs,
            pauses, "game started"
        );

        tokio::spawn(timer::run(ticket.clone()));
        tokio::spawn(sampler::run(ticket));
        Ok(())
    }

    /// Aborts any game in progress and returns the session to Idle.
    ///
    /// Safe to call in any phase; pending delays and in-flight samples
    /// of the aborted game become no-ops.
    pub fn reset(&self) {
        self.inner.finish(Phase::Idle, "Ready.", IndicatorColor::Green);
    }

    /// Returns a point-in-time copy of the observable state.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let state = self.inner.state.lock().expect("state lock poisoned");
        GameSnapshot {
            phase: state.phase,
            progress: state.progress,
            time_remaining: state.time_remaining,
            last_head_position: state.last_head_position,
            pending_pauses: state.schedule.pending(),
        }
    }
}

impl<S, D> SessionInner<S, D>
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    /// Bumps the session generation and installs a fresh cancellation
    /// token, returning the ticket for the new generation.
    ///
    /// Caller holds the state lock; the epoch bump alone already
    /// invalidates every older ticket.
    fn issue_ticket(&self, this: &Arc<Self>) -> SessionTicket<S, D> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        *self.cancel.lock().expect("cancel lock poisoned") = token.clone();
        SessionTicket {
            inner: Arc::clone(this),
            epoch,
            cancel: token,
        }
    }

    /// Ends the current session: clears state, parks it in `outcome`,
    /// and invalidates every outstanding ticket.
    ///
    /// Terminal outcomes fire at most once per game; resetting to Idle
    /// is always allowed. Calling this on an already-idle session with
    /// `Phase::Idle` is a no-op.
    pub(crate) fn finish(&self, outcome: Phase, status: &str, color: IndicatorColor) {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            if !state.phase.is_running() && outcome != Phase::Idle {
                // the game already ended; first terminal transition wins
                return;
            }
            if state.phase == Phase::Idle && outcome == Phase::Idle {
                return;
            }
            state.clear(outcome);
        }

        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.cancel.lock().expect("cancel lock poisoned").cancel();

        self.display.set_status_text(status);
        self.display.set_indicator_color(color);
        info!(outcome = ?outcome, "session finished");
        debug!("outstanding session callbacks invalidated");
    }
}
