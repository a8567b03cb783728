//! Dashboard session: connection status plus reducer, published as snapshots.
//!
//! The session is the single consumer of link events. After every event it
//! replaces the watched [`Snapshot`]; renderers subscribe and redraw on change.

use serde::Serialize;
use tokio::sync::watch;

use crate::event::LinkEvent;
use crate::models::{HistoryPoint, TelemetryState};
use crate::path::TrackView;
use crate::reducer::{Clock, LocalClock, ReducerConfig, TelemetryReducer};

/// Immutable view of the session handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub connected: bool,
    pub state: TelemetryState,
    pub history: Vec<HistoryPoint>,
    pub path: TrackView,
    /// Samples applied since the session started
    pub samples: u64,
}

pub struct Session<C = LocalClock> {
    reducer: TelemetryReducer,
    connected: bool,
    samples: u64,
    clock: C,
    tx: watch::Sender<Snapshot>,
}

impl Session<LocalClock> {
    pub fn new(config: ReducerConfig) -> Self {
        Self::with_clock(config, LocalClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(config: ReducerConfig, clock: C) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self {
            reducer: TelemetryReducer::new(config),
            connected: false,
            samples: 0,
            clock,
            tx,
        }
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Apply one link event and publish the resulting snapshot.
    pub fn handle(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Connected => self.connected = true,
            // Last known values stay on screen after link loss.
            LinkEvent::Disconnected => self.connected = false,
            LinkEvent::Telemetry(sample) => {
                let time = self.clock.now_label();
                self.reducer.apply(&sample, time);
                self.samples += 1;
            }
        }
        self.tx.send_replace(self.snapshot());
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            connected: self.connected,
            state: self.reducer.state().clone(),
            history: self.reducer.history_points(),
            path: self.reducer.path_view(),
            samples: self.samples,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
