//! Link configuration.

use std::fmt;
use std::time::Duration;

use clap::ValueEnum;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const DEFAULT_EVENT: &str = "telemetry_data";

/// Wire protocol spoken by the telemetry source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    /// Plain WebSocket, one JSON telemetry object per text frame
    #[value(alias = "ws", alias = "websocket")]
    Raw,
    /// Socket.IO v5 over Engine.IO v4 WebSocket transport
    #[default]
    #[value(name = "socketio", alias = "socket.io", alias = "sio")]
    SocketIo,
}

impl Protocol {
    /// Case-insensitive lookup by name or alias.
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true).ok()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Raw => f.write_str("raw"),
            Protocol::SocketIo => f.write_str("socketio"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Base URL of the telemetry source (http, https, ws or wss)
    pub endpoint: String,
    pub protocol: Protocol,
    /// Socket.IO event carrying telemetry
    pub event: String,
    pub reconnect_base: Duration,
    pub reconnect_max: Duration,
    /// Capacity of the per-subscriber event queue
    pub queue_capacity: usize,
}

impl LinkConfig {
    pub fn new(endpoint: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            endpoint: endpoint.into(),
            protocol,
            ..Self::default()
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.reconnect_base = base;
        self.reconnect_max = max;
        self
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            protocol: Protocol::default(),
            event: DEFAULT_EVENT.to_string(),
            reconnect_base: Duration::from_millis(500),
            reconnect_max: Duration::from_secs(5),
            queue_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_protocol_names() {
        assert_eq!(Protocol::parse("raw"), Some(Protocol::Raw));
        assert_eq!(Protocol::parse(" WebSocket "), Some(Protocol::Raw));
        assert_eq!(Protocol::parse("Socket.IO"), Some(Protocol::SocketIo));
        assert_eq!(Protocol::parse("socketio"), Some(Protocol::SocketIo));
        assert_eq!(Protocol::parse("mqtt"), None);
    }

    #[test]
    fn display_matches_flag_name() {
        for protocol in Protocol::value_variants() {
            let name = protocol.to_string();
            assert_eq!(Protocol::parse(&name), Some(*protocol));
        }
    }
}
