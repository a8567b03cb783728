//! Link error types.

use thiserror::Error;

/// Errors that end one connection attempt.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported URL scheme: {0}")]
    Scheme(String),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("handshake rejected: {0}")]
    Handshake(String),
}

/// Errors decoding a single inbound frame. These never end the connection.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed packet: {0}")]
    Packet(String),
}
