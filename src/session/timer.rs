//! Game countdown timer
//!
//! A 1 Hz task that decrements the countdown, dispatches scheduled
//! freeze windows, and evaluates the win and timeout conditions. Within
//! one tick the order is fixed: decrement, pause dispatch, win check,
//! timeout check; a win discovered on the same tick as the timeout
//! takes precedence.

use std::time::Duration;

use tracing::{debug, info};

use crate::display::{DisplaySink, IndicatorColor};
use crate::pose::HeadSampler;
use crate::schedule::PauseEvent;
use crate::session::state::Phase;
use crate::session::{SessionTicket, pause};

/// Runs the countdown until the game ends or the session is superseded.
pub(crate) async fn run<S, D>(ticket: SessionTicket<S, D>)
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // the first tick resolves immediately; the countdown starts one
    // second in
    interval.tick().await;

    loop {
        tokio::select! {
            () = ticket.cancel.cancelled() => {
                debug!("countdown task cancelled");
                break;
            }
            _ = interval.tick() => {
                if !tick(&ticket) {
                    break;
                }
            }
        }
    }
}

/// What a single tick decided, computed under the state lock and acted
/// on after it is released.
struct TickActions {
    time_remaining: u32,
    due_pause: Option<PauseEvent>,
    won: bool,
    timed_out: bool,
}

/// One countdown tick. Returns `false` when the timer should stop.
fn tick<S, D>(ticket: &SessionTicket<S, D>) -> bool
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    if !ticket.is_live() {
        return false;
    }
    let inner = &ticket.inner;

    let actions = {
        let mut state = inner.state.lock().expect("state lock poisoned");
        if !state.phase.is_running() {
            return false;
        }

        state.time_remaining = state.time_remaining.saturating_sub(1);
        let time_remaining = state.time_remaining;
        TickActions {
            time_remaining,
            due_pause: state.schedule.pop_due(time_remaining),
            won: state.progress >= inner.config.win_threshold,
            timed_out: time_remaining == 0,
        }
    };

    inner
        .display
        .set_countdown_text(&actions.time_remaining.to_string());

    // Dispatch before the win/timeout checks so a freeze landing on a
    // late tick still gets its controller. If the game ends on this
    // same tick, the controller's liveness check turns it into a no-op.
    if let Some(event) = actions.due_pause {
        info!(
            trigger = event.trigger_second,
            freeze = event.freeze_secs,
            "freeze window triggered"
        );
        tokio::spawn(pause::run(ticket.clone(), event));
    }

    if actions.won {
        inner.finish(Phase::Won, "You won!", IndicatorColor::Green);
        return false;
    }
    if actions.timed_out {
        inner.finish(Phase::Over, "Time's up! Game over.", IndicatorColor::Red);
        return false;
    }
    true
}
