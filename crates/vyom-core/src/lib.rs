//! VyomGarud core: telemetry model, reducer and snapshot session.
//!
//! Everything here is in-memory and I/O free. The link crate feeds
//! [`LinkEvent`]s into a [`Session`]; renderers watch its [`Snapshot`]s.

pub mod event;
pub mod history;
pub mod models;
pub mod path;
pub mod reducer;
pub mod session;
pub mod spatial;
pub mod view;

pub use event::LinkEvent;
pub use history::{TrailingHistory, DEFAULT_HISTORY_CAPACITY};
pub use models::{FlightMode, HistoryPoint, PathPoint, TelemetrySample, TelemetryState};
pub use path::{FlightTrack, TrackView};
pub use reducer::{Clock, LocalClock, ReducerConfig, TelemetryReducer};
pub use session::{Session, Snapshot};
pub use spatial::haversine_distance;
pub use view::{link_label, Readouts, DEFAULT_POSITION, MAP_ATTRIBUTION};
