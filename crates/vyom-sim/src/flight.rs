//! Simulated flight: a circling drone with a wavy altitude and draining battery.

use std::f64::consts::PI;

use vyom_core::spatial::{meters_per_deg_lon, METERS_PER_DEG_LAT};
use vyom_core::TelemetrySample;

/// Circular orbit around a center point, altitude oscillating once per lap.
#[derive(Debug, Clone)]
pub struct CircularPath {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_m: f64,
    pub altitude_m: f64,
    /// Altitude swing above/below `altitude_m`
    pub wave_m: f64,
    pub speed_mps: f64,
    period: f64,
}

impl CircularPath {
    pub fn new(
        center_lat: f64,
        center_lon: f64,
        radius_m: f64,
        altitude_m: f64,
        speed_mps: f64,
    ) -> Self {
        let radius_m = radius_m.max(1.0);
        let speed_mps = speed_mps.max(0.1);
        let period = 2.0 * PI * radius_m / speed_mps;
        Self {
            center_lat,
            center_lon,
            radius_m,
            altitude_m,
            wave_m: 0.0,
            speed_mps,
            period,
        }
    }

    pub fn with_wave(mut self, wave_m: f64) -> Self {
        self.wave_m = wave_m;
        self
    }

    /// Seconds per lap.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Angle swept since the east-most point, counter-clockwise, in radians.
    fn angle_at(&self, t: f64) -> f64 {
        2.0 * PI * t / self.period
    }

    /// (lat, lon, altitude_m) at t seconds into the flight.
    pub fn position_at(&self, t: f64) -> (f64, f64, f64) {
        let angle = self.angle_at(t);
        let lat = self.center_lat + (self.radius_m / METERS_PER_DEG_LAT) * angle.sin();
        let lon_scale = meters_per_deg_lon(self.center_lat);
        let lon = self.center_lon + (self.radius_m / lon_scale) * angle.cos();
        let alt = self.altitude_m + self.wave_m * angle.sin();
        (lat, lon, alt)
    }

    /// Course over ground in degrees clockwise from north.
    ///
    /// Counter-clockwise travel makes the tangent lead the radius by 90
    /// degrees, which works out to a course of `-angle`.
    pub fn heading_at(&self, t: f64) -> f64 {
        (-self.angle_at(t).to_degrees()).rem_euclid(360.0)
    }
}

/// Produces the telemetry samples a flight controller would report.
#[derive(Debug, Clone)]
pub struct TelemetrySim {
    orbit: CircularPath,
    /// Percent per second
    battery_drain: f64,
}

impl TelemetrySim {
    pub fn new(orbit: CircularPath) -> Self {
        Self {
            orbit,
            battery_drain: 0.1,
        }
    }

    /// Full sample at t seconds into the flight.
    pub fn sample_at(&self, t: f64) -> TelemetrySample {
        let (lat, lon, alt) = self.orbit.position_at(t);
        TelemetrySample::position(lat, lon, alt)
            .with_heading(self.orbit.heading_at(t))
            .with_speed(self.orbit.speed_mps)
            .with_battery(self.battery_at(t))
    }

    /// Drains linearly and wraps back to full at zero.
    pub fn battery_at(&self, t: f64) -> f64 {
        100.0 - (t * self.battery_drain) % 100.0
    }
}
