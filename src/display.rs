//! Display sink seam
//!
//! The core never renders anything itself: every user-visible update
//! flows through [`DisplaySink`] as a side effect. Layout, widgets, and
//! styling belong to the embedding application.

/// Indicator color communicating the current phase at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    /// Safe to move (Active, or a won game)
    Green,
    /// Warning window, freeze imminent
    Amber,
    /// Frozen, or the game is lost
    Red,
}

/// Side-effect-only presentation sink.
///
/// Implementations must be cheap and non-blocking; they are invoked
/// from the timer tick and the sampling loop.
pub trait DisplaySink: Send + Sync {
    /// Updates the one-line status text.
    fn set_status_text(&self, text: &str);

    /// Updates the countdown display.
    fn set_countdown_text(&self, text: &str);

    /// Updates the progress bar value.
    fn set_progress_value(&self, value: u32);

    /// Updates the phase indicator color.
    fn set_indicator_color(&self, color: IndicatorColor);
}

impl<T: DisplaySink + ?Sized> DisplaySink for std::sync::Arc<T> {
    fn set_status_text(&self, text: &str) {
        (**self).set_status_text(text);
    }

    fn set_countdown_text(&self, text: &str) {
        (**self).set_countdown_text(text);
    }

    fn set_progress_value(&self, value: u32) {
        (**self).set_progress_value(value);
    }

    fn set_indicator_color(&self, color: IndicatorColor) {
        (**self).set_indicator_color(color);
    }
}

/// A sink that drops every update. Useful for headless embedding and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn set_status_text(&self, _text: &str) {}
    fn set_countdown_text(&self, _text: &str) {}
    fn set_progress_value(&self, _value: u32) {}
    fn set_indicator_color(&self, _color: IndicatorColor) {}
}

/// A sink that prints updates to stdout, one line each. Used by the
/// `statues run` demo.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDisplay;

impl DisplaySink for ConsoleDisplay {
    fn set_status_text(&self, text: &str) {
        println!("status: {text}");
    }

    fn set_countdown_text(&self, text: &str) {
        println!("time left: {text}");
    }

    fn set_progress_value(&self, value: u32) {
        println!("progress: {value}");
    }

    fn set_indicator_color(&self, color: IndicatorColor) {
        let name = match color {
            IndicatorColor::Green => "green",
            IndicatorColor::Amber => "amber",
            IndicatorColor::Red => "red",
        };
        println!("indicator: {name}");
    }
}
