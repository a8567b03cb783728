//! VyomGarud simulator: a circling drone's telemetry served over WebSocket.
//!
//! Stands in for the flight-controller bridge during development. Clients
//! connect with the raw protocol to `/` or `/ws`, or with Socket.IO to
//! `/socket.io/`, which is what the dashboard dials by default.

pub mod config;
pub mod flight;
pub mod server;

pub use config::{Args, SimConfig};
pub use flight::{CircularPath, TelemetrySim};
pub use server::{routes, run_emitter, AppState, TELEMETRY_EVENT};
