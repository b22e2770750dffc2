//! Warning/freeze controller
//!
//! One task per dispatched [`PauseEvent`], sequencing the pause
//! sub-protocol: a warning window (movement still scores), then the
//! freeze window (movement loses, enforced by the sampling loop), then
//! resumption. Both waits ride the session's cancellation token, and
//! every stage re-checks liveness and phase before acting, so a delay
//! that outlives its game is a no-op.

use std::time::Duration;

use tracing::{debug, info};

use crate::display::{DisplaySink, IndicatorColor};
use crate::pose::HeadSampler;
use crate::schedule::PauseEvent;
use crate::session::state::Phase;
use crate::session::{STATUS_FROZEN, STATUS_MOVE, STATUS_WARNING, SessionTicket};

/// Runs one warning → freeze → resume sequence.
pub(crate) async fn run<S, D>(ticket: SessionTicket<S, D>, event: PauseEvent)
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    let inner = &ticket.inner;

    // Warning stage. Only an Active session enters it; anything else
    // means this dispatch was superseded before it ran.
    {
        let mut state = inner.state.lock().expect("state lock poisoned");
        if !ticket.is_live() || state.phase != Phase::Active {
            debug!("pause dispatch superseded, skipping");
            return;
        }
        state.phase = Phase::Warning;
    }
    inner.display.set_status_text(STATUS_WARNING);
    inner.display.set_indicator_color(IndicatorColor::Amber);
    info!(freeze = event.freeze_secs, "warning window opened");

    tokio::select! {
        () = ticket.cancel.cancelled() => return,
        () = tokio::time::sleep(inner.config.tolerance()) => {}
    }

    // Freeze stage. The sampling loop has been refreshing the reference
    // position through the warning window; whatever it holds now is
    // what the player must hold.
    {
        let mut state = inner.state.lock().expect("state lock poisoned");
        if !ticket.is_live() || state.phase != Phase::Warning {
            debug!("warning window ended by session teardown");
            return;
        }
        state.phase = Phase::Frozen;
    }
    inner.display.set_status_text(STATUS_FROZEN);
    inner.display.set_indicator_color(IndicatorColor::Red);
    info!(secs = event.freeze_secs, "freeze window opened");

    tokio::select! {
        () = ticket.cancel.cancelled() => return,
        () = tokio::time::sleep(Duration::from_secs(u64::from(event.freeze_secs))) => {}
    }

    // Resume. A loss during the freeze or a reset changed the phase
    // already; in that case there is nothing to resume.
    {
        let mut state = inner.state.lock().expect("state lock poisoned");
        if !ticket.is_live() || state.phase != Phase::Frozen {
            debug!("freeze window ended by session teardown");
            return;
        }
        state.phase = Phase::Active;
    }
    inner.display.set_status_text(STATUS_MOVE);
    inner.display.set_indicator_color(IndicatorColor::Green);
    info!("freeze window survived, resuming");
}
