//! Simulator configuration from environment and flags.

use std::env;

use clap::Parser;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub port: u16,
    /// Samples per second
    pub rate_hz: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_m: f64,
    pub altitude_m: f64,
    pub wave_m: f64,
    pub speed_mps: f64,
}

impl SimConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("VYOM_SIM_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            ..Self::default()
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            rate_hz: 10.0,
            center_lat: 12.9716,
            center_lon: 77.5946,
            radius_m: 220.0,
            altitude_m: 50.0,
            wave_m: 10.0,
            speed_mps: 22.5,
        }
    }
}

/// Serve simulated drone telemetry over WebSocket
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Listen port (overrides VYOM_SIM_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Update rate in Hz
    #[arg(long)]
    pub rate: Option<f64>,

    /// Orbit center latitude
    #[arg(long)]
    pub lat: Option<f64>,

    /// Orbit center longitude
    #[arg(long)]
    pub lon: Option<f64>,

    /// Orbit radius in meters
    #[arg(long)]
    pub radius: Option<f64>,

    /// Base altitude in meters
    #[arg(long)]
    pub altitude: Option<f64>,
}

impl Args {
    pub fn apply(&self, config: &mut SimConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(rate) = self.rate.filter(|r| *r > 0.0) {
            config.rate_hz = rate;
        }
        if let Some(lat) = self.lat {
            config.center_lat = lat;
        }
        if let Some(lon) = self.lon {
            config.center_lon = lon;
        }
        if let Some(radius) = self.radius {
            config.radius_m = radius;
        }
        if let Some(altitude) = self.altitude {
            config.altitude_m = altitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let mut config = SimConfig::default();
        let args = Args::try_parse_from([
            "vyom-sim", "--port", "6000", "--rate", "0", "--lat", "33.6846", "--lon", "-117.8265",
        ])
        .unwrap();
        args.apply(&mut config);

        assert_eq!(config.port, 6000);
        assert_eq!(config.rate_hz, 10.0);
        assert_eq!(config.center_lat, 33.6846);
        assert_eq!(config.center_lon, -117.8265);
    }
}
