//! Telemetry reducer: folds inbound samples into state, history and track.
//!
//! Missing fields are handled differently per output, and this is kept on
//! purpose:
//! - the state merge leaves absent fields at their previous value, so
//!   readouts show the last reported number;
//! - the history zero-fills absent `alt`/`speed`, so the chart has exactly one
//!   point per sample.

use chrono::Local;

use crate::history::{TrailingHistory, DEFAULT_HISTORY_CAPACITY};
use crate::models::{HistoryPoint, TelemetrySample, TelemetryState};
use crate::path::{FlightTrack, TrackView};

/// Source of the display timestamp attached to history points.
pub trait Clock {
    fn now_label(&self) -> String;
}

/// Local wall-clock time formatted as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now_label(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

impl<F> Clock for F
where
    F: Fn() -> String,
{
    fn now_label(&self) -> String {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducerConfig {
    /// Maximum chart points retained
    pub history_capacity: usize,
    /// Maximum track points retained (`None` = unbounded)
    pub path_limit: Option<usize>,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            path_limit: None,
        }
    }
}

/// Latest state, trailing history and flight track for one session.
#[derive(Debug, Clone)]
pub struct TelemetryReducer {
    state: TelemetryState,
    history: TrailingHistory,
    path: FlightTrack,
}

impl TelemetryReducer {
    pub fn new(config: ReducerConfig) -> Self {
        Self {
            state: TelemetryState::default(),
            history: TrailingHistory::new(config.history_capacity),
            path: FlightTrack::new(config.path_limit),
        }
    }

    /// Fold one sample. Never fails; partial samples degrade gracefully.
    pub fn apply(&mut self, sample: &TelemetrySample, time: impl Into<String>) {
        self.state.merge(sample);

        if let Some(point) = sample.fix() {
            self.path.push(point);
        }

        self.history.push(HistoryPoint::from_sample(sample, time));
    }

    pub fn state(&self) -> &TelemetryState {
        &self.state
    }

    pub fn history(&self) -> &TrailingHistory {
        &self.history
    }

    pub fn path(&self) -> &FlightTrack {
        &self.path
    }

    pub fn history_points(&self) -> Vec<HistoryPoint> {
        self.history.to_vec()
    }

    pub fn path_view(&self) -> TrackView {
        self.path.view()
    }
}

impl Default for TelemetryReducer {
    fn default() -> Self {
        Self::new(ReducerConfig::default())
    }
}
