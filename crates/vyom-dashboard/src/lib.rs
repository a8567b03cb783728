//! VyomGarud dashboard: terminal presentation of live drone telemetry.

pub mod app;
pub mod config;
pub mod plain;
pub mod ui;

pub use app::{drive, run, Mode};
pub use config::{Args, DashboardConfig};
