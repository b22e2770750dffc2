//! Observability for `statues`
//!
//! Structured logging via `tracing`. State transitions log at `info`,
//! recovered skips and stale-callback discards at `debug`.

pub mod logging;

pub use logging::{LogFormat, init_logging};
