//! `statues` - Motion-gated freeze game engine
//!
//! This library implements the orchestration core of a "statues"-style
//! timing game: the player must keep moving to accumulate progress, but
//! must hold still during randomly scheduled freeze windows or lose.
//! Camera capture, pose estimation, and presentation are external
//! collaborators behind the [`pose::HeadSampler`] and
//! [`display::DisplaySink`] seams.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod observability;
pub mod pose;
pub mod schedule;
pub mod session;
