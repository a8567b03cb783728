//! Core data models for the telemetry dashboard.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// One telemetry reading as it arrives on the wire.
///
/// Every field is optional. A missing key, an explicit `null` and a value that
/// is not a number all deserialize to `None`, so one bad field never costs the
/// rest of the sample. Unknown keys (roll, pitch, voltage, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub lat: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub lon: Option<f64>,
    /// Altitude in meters
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt: Option<f64>,
    /// Heading in degrees (0 = North)
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub heading: Option<f64>,
    /// Ground speed in meters per second
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed: Option<f64>,
    /// Remaining battery in percent
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub battery: Option<f64>,
}

impl TelemetrySample {
    /// Sample carrying a full position fix.
    pub fn position(lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            alt: Some(alt),
            ..Self::default()
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_battery(mut self, battery: f64) -> Self {
        self.battery = Some(battery);
        self
    }

    /// Both coordinates, if both are truthy.
    pub fn fix(&self) -> Option<PathPoint> {
        match (truthy(self.lat), truthy(self.lon)) {
            (Some(lat), Some(lon)) => Some(PathPoint { lat, lon }),
            _ => None,
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Number(f64),
        Other(IgnoredAny),
    }

    Ok(match Option::<Field>::deserialize(deserializer)? {
        Some(Field::Number(value)) => Some(value),
        _ => None,
    })
}

/// A value counts as present only when it is set, non-zero and not NaN.
pub fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlightMode {
    /// No sample received yet
    #[default]
    Disconnected,
    /// At least one sample received
    Flying,
}

impl FlightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightMode::Disconnected => "DISCONNECTED",
            FlightMode::Flying => "FLYING",
        }
    }
}

impl std::fmt::Display for FlightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known state of the vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryState {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub heading: f64,
    pub speed: f64,
    pub battery: f64,
    pub mode: FlightMode,
}

impl TelemetryState {
    /// Shallow merge: present fields overwrite, absent fields keep their value.
    pub fn merge(&mut self, sample: &TelemetrySample) {
        if let Some(lat) = sample.lat {
            self.lat = lat;
        }
        if let Some(lon) = sample.lon {
            self.lon = lon;
        }
        if let Some(alt) = sample.alt {
            self.alt = alt;
        }
        if let Some(heading) = sample.heading {
            self.heading = heading;
        }
        if let Some(speed) = sample.speed {
            self.speed = speed;
        }
        if let Some(battery) = sample.battery {
            self.battery = battery;
        }
        self.mode = FlightMode::Flying;
    }

    /// Current coordinates, if both are truthy.
    pub fn fix(&self) -> Option<PathPoint> {
        match (truthy(Some(self.lat)), truthy(Some(self.lon))) {
            (Some(lat), Some(lon)) => Some(PathPoint { lat, lon }),
            _ => None,
        }
    }
}

/// One entry of the altitude/speed chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Local wall-clock time, display formatted
    pub time: String,
    pub alt: f64,
    pub speed: f64,
}

impl HistoryPoint {
    /// Chart point for a sample; missing alt/speed are charted as zero.
    pub fn from_sample(sample: &TelemetrySample, time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            alt: sample.alt.unwrap_or(0.0),
            speed: sample.speed.unwrap_or(0.0),
        }
    }
}

/// A visited position on the map track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<PathPoint> for (f64, f64) {
    fn from(point: PathPoint) -> Self {
        (point.lat, point.lon)
    }
}
