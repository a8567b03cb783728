//! Dashboard configuration: environment first, command-line flags on top.

use std::env;
use std::path::PathBuf;

use clap::Parser;
use vyom_core::{ReducerConfig, DEFAULT_HISTORY_CAPACITY};
use vyom_link::{LinkConfig, Protocol, DEFAULT_ENDPOINT, DEFAULT_EVENT};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub stream_url: String,
    pub protocol: Protocol,
    pub event: String,
    pub history_len: usize,
    pub max_path_points: Option<usize>,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            stream_url: lookup("VYOM_STREAM_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            protocol: lookup("VYOM_PROTOCOL")
                .and_then(|s| Protocol::parse(&s))
                .unwrap_or_default(),
            event: lookup("VYOM_EVENT").unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            history_len: lookup("VYOM_HISTORY_LEN")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_HISTORY_CAPACITY),
            max_path_points: lookup("VYOM_MAX_PATH_POINTS")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0),
        }
    }

    pub fn link_config(&self) -> LinkConfig {
        LinkConfig::new(self.stream_url.clone(), self.protocol).with_event(self.event.clone())
    }

    pub fn reducer_config(&self) -> ReducerConfig {
        ReducerConfig {
            history_capacity: self.history_len,
            path_limit: self.max_path_points,
        }
    }
}

/// Live telemetry dashboard for a single drone
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Telemetry source URL (overrides VYOM_STREAM_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Wire protocol (overrides VYOM_PROTOCOL)
    #[arg(long, value_enum, ignore_case = true)]
    pub protocol: Option<Protocol>,

    /// Socket.IO event carrying telemetry (overrides VYOM_EVENT)
    #[arg(long)]
    pub event: Option<String>,

    /// Chart history length (overrides VYOM_HISTORY_LEN)
    #[arg(long)]
    pub history: Option<usize>,

    /// Cap on map track points; unbounded when unset
    #[arg(long)]
    pub max_path_points: Option<usize>,

    /// Print one line per update instead of the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Write logs to this file while the terminal UI is active
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn apply(&self, config: &mut DashboardConfig) {
        if let Some(url) = &self.url {
            config.stream_url = url.clone();
        }
        if let Some(protocol) = self.protocol {
            config.protocol = protocol;
        }
        if let Some(event) = &self.event {
            config.event = event.clone();
        }
        if let Some(history) = self.history.filter(|n| *n > 0) {
            config.history_len = history;
        }
        if let Some(limit) = self.max_path_points.filter(|n| *n > 0) {
            config.max_path_points = Some(limit);
        }
    }
}
