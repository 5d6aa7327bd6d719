//! Display Sink
//!
//! Where readings and the trigger state end up. The simulation only talks
//! to the [`DisplaySink`] trait; hosts pick an implementation:
//!
//! - [`ConsoleDisplay`] writes plain text to any `Write` (stdout in the CLI)
//! - [`LatestDisplay`] keeps only what is on screen now (wasm)
//! - [`RecordingDisplay`] keeps the full history in memory (tests)

use std::io::Write;

use super::hexagram::UNRECOGNIZED_MESSAGE;
use super::reading::Reading;

pub const LABEL_INITIAL: &str = "抛掷铜钱";
pub const LABEL_TOSSING: &str = "铜钱翻转中...";
pub const LABEL_AGAIN: &str = "再次抛掷";

/// State of the toss trigger (button or key).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    pub enabled: bool,
    pub label: &'static str,
}

impl TriggerState {
    pub const INITIAL: TriggerState = TriggerState {
        enabled: true,
        label: LABEL_INITIAL,
    };
    pub const TOSSING: TriggerState = TriggerState {
        enabled: false,
        label: LABEL_TOSSING,
    };
    pub const AGAIN: TriggerState = TriggerState {
        enabled: true,
        label: LABEL_AGAIN,
    };
}

pub trait DisplaySink {
    fn show_trigger(&mut self, trigger: &TriggerState);
    /// Remove the previous reading, if any.
    fn clear_reading(&mut self);
    fn show_reading(&mut self, reading: &Reading);
}

/// Text that a reading shows as its body: the meaning, or the
/// unrecognized message when the table had no entry.
pub fn reading_body(reading: &Reading) -> &str {
    match &reading.hexagram {
        Some(h) => &h.meaning,
        None => UNRECOGNIZED_MESSAGE,
    }
}

/// Plain-text display. Write failures are logged and otherwise ignored.
pub struct ConsoleDisplay<W: Write> {
    out: W,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        let result = self
            .out
            .write_fmt(text)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "display write failed");
        }
    }
}

impl<W: Write> DisplaySink for ConsoleDisplay<W> {
    fn show_trigger(&mut self, trigger: &TriggerState) {
        if trigger.enabled {
            self.emit(format_args!("[{}]", trigger.label));
        } else {
            self.emit(format_args!("{}", trigger.label));
        }
    }

    fn clear_reading(&mut self) {}

    fn show_reading(&mut self, reading: &Reading) {
        self.emit(format_args!("{}", reading.title()));
        self.emit(format_args!("{}", reading_body(reading)));
    }
}

/// Display state for hosts that redraw from it: the current trigger and
/// the reading on screen, nothing else.
#[derive(Debug, Clone)]
pub struct LatestDisplay {
    pub trigger: TriggerState,
    pub current: Option<Reading>,
}

impl LatestDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for LatestDisplay {
    fn default() -> Self {
        Self {
            trigger: TriggerState::INITIAL,
            current: None,
        }
    }
}

impl DisplaySink for LatestDisplay {
    fn show_trigger(&mut self, trigger: &TriggerState) {
        self.trigger = *trigger;
    }

    fn clear_reading(&mut self) {
        self.current = None;
    }

    fn show_reading(&mut self, reading: &Reading) {
        self.current = Some(reading.clone());
    }
}

/// In-memory display keeping the full history.
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    pub triggers: Vec<TriggerState>,
    pub readings: Vec<Reading>,
    /// Reading currently on screen
    pub current: Option<Reading>,
    pub clears: usize,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last trigger state shown, or the initial one.
    pub fn trigger(&self) -> TriggerState {
        self.triggers.last().copied().unwrap_or(TriggerState::INITIAL)
    }
}

impl DisplaySink for RecordingDisplay {
    fn show_trigger(&mut self, trigger: &TriggerState) {
        self.triggers.push(*trigger);
    }

    fn clear_reading(&mut self) {
        self.current = None;
        self.clears += 1;
    }

    fn show_reading(&mut self, reading: &Reading) {
        self.current = Some(reading.clone());
        self.readings.push(reading.clone());
    }
}
