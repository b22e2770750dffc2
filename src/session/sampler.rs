//! Motion sampling loop
//!
//! A self-rescheduling task that samples the head position at a fixed
//! cadence, independent of the countdown. Each iteration queries the
//! sampler (a suspension point of uncontrolled latency), reduces the
//! landmarks to a head position, and dispatches on the current phase:
//! movement scores while Active or Warning, and loses while Frozen.
//!
//! Liveness is checked at the top of every iteration and again
//! immediately after the suspension point, so a result that arrives
//! after a reset never touches the new session's state.

use tracing::{debug, info, warn};

use crate::display::{DisplaySink, IndicatorColor};
use crate::pose::{HeadPosition, HeadSampler};
use crate::session::SessionTicket;
use crate::session::state::Phase;

/// Runs the sampling loop until the game ends or the session is
/// superseded.
pub(crate) async fn run<S, D>(ticket: SessionTicket<S, D>)
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    let inner = &ticket.inner;
    loop {
        if !ticket.is_live() {
            break;
        }
        if !inner
            .state
            .lock()
            .expect("state lock poisoned")
            .phase
            .is_running()
        {
            break;
        }

        let result = tokio::select! {
            () = ticket.cancel.cancelled() => break,
            result = inner.sampler.sample(inner.config.landmark_confidence) => result,
        };
        // the estimate was a suspension point; the session may have
        // ended or been superseded while it was in flight
        if !ticket.is_live() {
            break;
        }

        match result {
            Err(e) => warn!(error = %e, "sample failed, skipping"),
            Ok(landmarks) => {
                match HeadPosition::from_landmarks(&landmarks, inner.config.landmark_confidence) {
                    None => debug!("no qualifying landmark, skipping sample"),
                    Some(position) => {
                        if !apply_sample(&ticket, position) {
                            break;
                        }
                    }
                }
            }
        }

        tokio::select! {
            () = ticket.cancel.cancelled() => break,
            () = tokio::time::sleep(inner.config.detection_interval()) => {}
        }
    }
    debug!("sampling loop stopped");
}

enum SampleOutcome {
    Continue,
    Progress(u32),
    FrozenLoss,
    Stop,
}

/// Applies one head sample to the game state. Returns `false` when the
/// loop should stop.
pub(super) fn apply_sample<S, D>(ticket: &SessionTicket<S, D>, current: HeadPosition) -> bool
where
    S: HeadSampler + 'static,
    D: DisplaySink + 'static,
{
    let inner = &ticket.inner;
    let config = &inner.config;

    let outcome = {
        let mut state = inner.state.lock().expect("state lock poisoned");
        match state.phase {
            Phase::Frozen => match state.last_head_position {
                Some(prev) if current.displaced_from(prev, config.movement_threshold) => {
                    SampleOutcome::FrozenLoss
                }
                _ => {
                    // either still, or no reference position yet (the
                    // player was invisible through the whole warning
                    // window); seed instead of comparing
                    state.last_head_position = Some(current);
                    SampleOutcome::Continue
                }
            },
            Phase::Active | Phase::Warning => {
                let mut scored = None;
                if let Some(prev) = state.last_head_position {
                    if current.displaced_from(prev, config.movement_threshold) {
                        state.progress =
                            (state.progress + config.progress_increment).min(config.win_threshold);
                        scored = Some(state.progress);
                    }
                }
                // the first sample of a game only seeds the reference
                state.last_head_position = Some(current);
                scored.map_or(SampleOutcome::Continue, SampleOutcome::Progress)
            }
            Phase::Idle | Phase::Over | Phase::Won => SampleOutcome::Stop,
        }
    };

    match outcome {
        SampleOutcome::Continue => true,
        SampleOutcome::Progress(progress) => {
            debug!(progress, "movement scored");
            inner.display.set_progress_value(progress);
            true
        }
        SampleOutcome::FrozenLoss => {
            info!("movement during freeze window");
            inner.finish(Phase::Over, "You moved! Game over.", IndicatorColor::Red);
            false
        }
        SampleOutcome::Stop => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::pose::scripted::ScriptFrame;
    use crate::session::testing::{TestTicket, running_session};

    fn still() -> Vec<ScriptFrame> {
        vec![ScriptFrame::At { x: 0.0, y: 0.0 }]
    }

    fn at(x: f64, y: f64) -> HeadPosition {
        HeadPosition { x, y }
    }

    fn set_phase(ticket: &TestTicket, phase: Phase) {
        ticket.inner.state.lock().unwrap().phase = phase;
    }

    #[tokio::test]
    async fn test_first_sample_seeds_without_scoring() {
        let (session, ticket) = running_session(GameConfig::default(), still());

        assert!(apply_sample(&ticket, at(500.0, 500.0)));

        let snap = session.snapshot();
        assert_eq!(snap.progress, 0);
        assert_eq!(snap.last_head_position, Some(at(500.0, 500.0)));
    }

    #[tokio::test]
    async fn test_displacement_scores_in_active() {
        let (session, ticket) = running_session(GameConfig::default(), still());

        assert!(apply_sample(&ticket, at(0.0, 0.0)));
        assert!(apply_sample(&ticket, at(20.0, 0.0)));

        let snap = session.snapshot();
        assert_eq!(snap.progress, 5);
        assert_eq!(snap.last_head_position, Some(at(20.0, 0.0)));
    }

    #[tokio::test]
    async fn test_displacement_scores_in_warning() {
        let (session, ticket) = running_session(GameConfig::default(), still());
        apply_sample(&ticket, at(0.0, 0.0));
        set_phase(&ticket, Phase::Warning);

        assert!(apply_sample(&ticket, at(0.0, 20.0)));
        assert_eq!(session.snapshot().progress, 5);
    }

    #[tokio::test]
    async fn test_small_movement_does_not_score() {
        let (session, ticket) = running_session(GameConfig::default(), still());

        apply_sample(&ticket, at(0.0, 0.0));
        apply_sample(&ticket, at(9.0, 9.0));

        assert_eq!(session.snapshot().progress, 0);
    }

    #[tokio::test]
    async fn test_progress_clamps_at_win_threshold() {
        let (session, ticket) = running_session(GameConfig::default(), still());
        ticket.inner.state.lock().unwrap().progress = 98;

        apply_sample(&ticket, at(0.0, 0.0));
        apply_sample(&ticket, at(20.0, 0.0));

        assert_eq!(session.snapshot().progress, 100);
    }

    #[tokio::test]
    async fn test_frozen_movement_loses() {
        let (session, ticket) = running_session(GameConfig::default(), still());
        apply_sample(&ticket, at(0.0, 0.0));
        set_phase(&ticket, Phase::Frozen);

        assert!(!apply_sample(&ticket, at(20.0, 0.0)));
        assert_eq!(session.snapshot().phase, Phase::Over);
    }

    #[tokio::test]
    async fn test_frozen_loss_ignores_progress_and_clock() {
        let (session, ticket) = running_session(GameConfig::default(), still());
        {
            let mut state = ticket.inner.state.lock().unwrap();
            state.progress = 95;
            state.time_remaining = 50;
            state.last_head_position = Some(at(0.0, 0.0));
            state.phase = Phase::Frozen;
        }

        apply_sample(&ticket, at(0.0, 40.0));
        assert_eq!(session.snapshot().phase, Phase::Over);
    }

    #[tokio::test]
    async fn test_frozen_stillness_does_not_score() {
        let (session, ticket) = running_session(GameConfig::default(), still());
        apply_sample(&ticket, at(0.0, 0.0));
        set_phase(&ticket, Phase::Frozen);

        assert!(apply_sample(&ticket, at(3.0, 3.0)));

        let snap = session.snapshot();
        assert_eq!(snap.progress, 0);
        assert_eq!(snap.phase, Phase::Frozen);
        // the reference position tracks the latest sample
        assert_eq!(snap.last_head_position, Some(at(3.0, 3.0)));
    }

    #[tokio::test]
    async fn test_frozen_without_reference_seeds() {
        let (session, ticket) = running_session(GameConfig::default(), still());
        set_phase(&ticket, Phase::Frozen);

        // No reference position: the sample seeds rather than losing.
        assert!(apply_sample(&ticket, at(100.0, 100.0)));
        assert_eq!(session.snapshot().phase, Phase::Frozen);
    }

    #[tokio::test]
    async fn test_terminal_phase_stops_loop() {
        let (_session, ticket) = running_session(GameConfig::default(), still());
        set_phase(&ticket, Phase::Over);

        assert!(!apply_sample(&ticket, at(0.0, 0.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_exits_on_cancel() {
        let (session, ticket) = running_session(GameConfig::default(), still());

        let handle = tokio::spawn(run(ticket));
        session.reset();

        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("loop should stop after reset")
            .unwrap();
    }
}
