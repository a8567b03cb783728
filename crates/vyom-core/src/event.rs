//! Events delivered by the telemetry link.

use crate::models::TelemetrySample;

#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// Link established (fires once per successful connection)
    Connected,
    /// Link lost
    Disconnected,
    /// One inbound sample
    Telemetry(TelemetrySample),
}

impl LinkEvent {
    /// Event name as seen on the stream.
    pub fn name(&self) -> &'static str {
        match self {
            LinkEvent::Connected => "connect",
            LinkEvent::Disconnected => "disconnect",
            LinkEvent::Telemetry(_) => "telemetry",
        }
    }
}
