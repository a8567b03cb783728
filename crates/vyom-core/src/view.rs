//! Values derived from a snapshot for display.

use crate::models::PathPoint;
use crate::session::Snapshot;
use crate::spatial::haversine_distance;

/// Map position shown before any fix arrives (Bengaluru).
pub const DEFAULT_POSITION: PathPoint = PathPoint {
    lat: 12.9716,
    lon: 77.5946,
};

pub const MAP_ATTRIBUTION: &str = "\u{a9} OpenStreetMap contributors";

pub fn link_label(connected: bool) -> &'static str {
    if connected {
        "LINK ESTABLISHED"
    } else {
        "SEARCHING FOR LINK"
    }
}

impl Snapshot {
    /// Current fix, or the default position when either coordinate is falsy.
    pub fn current_position(&self) -> PathPoint {
        self.state.fix().unwrap_or(DEFAULT_POSITION)
    }

    /// Distance from the first track point to the current position.
    pub fn distance_from_home_m(&self) -> f64 {
        match (self.path.first(), self.state.fix()) {
            (Some(home), Some(here)) => haversine_distance(home.lat, home.lon, here.lat, here.lon),
            _ => 0.0,
        }
    }

    pub fn readouts(&self) -> Readouts {
        Readouts {
            altitude: format!("{:.1} m", self.state.alt),
            ground_speed: format!("{:.1} m/s", self.state.speed),
            distance_from_home: format!("{:.0} m", self.distance_from_home_m()),
            flight_mode: self.state.mode.to_string(),
            battery: format!("{}%", self.state.battery),
            link: link_label(self.connected),
        }
    }
}

/// Formatted readout strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Readouts {
    pub altitude: String,
    pub ground_speed: String,
    pub distance_from_home: String,
    pub flight_mode: String,
    pub battery: String,
    pub link: &'static str,
}
