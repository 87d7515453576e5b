//! Software-debounced button detector.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the line pulled up: electrical high is
//! the idle level, low means pressed. The main loop samples the raw level
//! once per tick and feeds it here with a monotonic timestamp; the detector
//! is pure with respect to time and level and does no I/O.
//!
//! ## Settling window
//!
//! A raw level must hold for the full window (default 50 ms, boundary
//! inclusive) before it is believed. Any flip restarts the clock, so
//! contact bounce inside the window never commits. The clock measures from
//! the last sample still at the old level: a change first seen at tick *n*
//! commits on the tick where a full window has elapsed since the signal
//! could last have been at the old level.
//!
//! Only the `Idle → Active` edge emits a [`Transition`] — releases commit
//! silently to re-arm detection. Several real presses inside one window
//! collapse into a single event; acceptable for a press notifier.

/// Logical level after polarity mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Line at rest (electrical high on a pulled-up input).
    Idle,
    /// Button pressed (electrical low).
    Active,
}

impl Level {
    pub fn from_raw(raw_high: bool) -> Self {
        if raw_high { Self::Idle } else { Self::Active }
    }
}

/// One raw reading of the input line. Produced every tick, never stored
/// beyond the comparison in [`DebounceDetector::observe`].
#[derive(Debug, Clone, Copy)]
pub struct InputSample {
    /// Electrical level: `true` = high.
    pub raw_high: bool,
    /// Monotonic milliseconds since agent start.
    pub at_ms: u64,
}

/// A confirmed `Idle → Active` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Timestamp of the sample that confirmed the edge.
    pub at_ms: u64,
}

pub struct DebounceDetector {
    window_ms: u64,
    last_raw: Level,
    confirmed: Level,
    /// Last time the raw level was still at its previous value.
    last_change_at_ms: u64,
    prev_sample_at_ms: u64,
}

impl DebounceDetector {
    /// `window_ms` must be positive; config validation rejects zero before
    /// construction.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_raw: Level::Idle,
            confirmed: Level::Idle,
            last_change_at_ms: 0,
            prev_sample_at_ms: 0,
        }
    }

    pub fn confirmed_level(&self) -> Level {
        self.confirmed
    }

    /// Feed one sample; returns a transition iff this sample confirms a
    /// new `Idle → Active` edge.
    pub fn observe(&mut self, sample: InputSample) -> Option<Transition> {
        let level = Level::from_raw(sample.raw_high);

        if level != self.last_raw {
            // Settling clock restarts from the last sample at the old
            // level; noise inside the window keeps restarting it.
            self.last_change_at_ms = self.prev_sample_at_ms;
            self.last_raw = level;
        }
        self.prev_sample_at_ms = sample.at_ms;

        let held_ms = sample.at_ms.saturating_sub(self.last_change_at_ms);
        if level != self.confirmed && held_ms >= self.window_ms {
            self.confirmed = level;
            if level == Level::Active {
                return Some(Transition { at_ms: sample.at_ms });
            }
        }
        None
    }
}
