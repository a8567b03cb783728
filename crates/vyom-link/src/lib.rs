//! VyomGarud link: the live telemetry connection handle.
//!
//! Speaks either plain WebSocket JSON frames or Socket.IO, reconnects with
//! backoff, and fans [`LinkEvent`](vyom_core::LinkEvent)s out to subscribers.

pub mod backoff;
pub mod config;
pub mod connection;
pub mod error;
pub mod frame;

pub use config::{LinkConfig, Protocol, DEFAULT_ENDPOINT, DEFAULT_EVENT};
pub use connection::{endpoint_url, Connection, Subscription};
pub use error::{FrameError, LinkError};
