//! WebSocket relay: every generated sample goes to every connected client.
//!
//! Two wire formats share one sample feed:
//! - `/` and `/ws`: raw, one JSON object per text frame;
//! - `/socket.io/`: Engine.IO v4 / Socket.IO v5 on the default namespace,
//!   samples emitted as the `telemetry_data` event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::flight::TelemetrySim;

/// Socket.IO event name carrying samples.
pub const TELEMETRY_EVENT: &str = "telemetry_data";

const PING_INTERVAL: Duration = Duration::from_secs(25);
const PING_TIMEOUT: Duration = Duration::from_secs(20);

/// Shared server state: the fan-out channel of serialized samples.
#[derive(Clone)]
pub struct AppState {
    pub tx: broadcast::Sender<String>,
    sessions: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            tx,
            sessions: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_sid(&self) -> String {
        let n = self.sessions.fetch_add(1, Ordering::Relaxed);
        format!("vyom-sim-{:06}", n)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/socket.io/", get(socketio_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    info!("client connected");
    let mut rx = state.tx.subscribe();

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            frame = rx.recv() => {
                match frame {
                    Ok(payload) => {
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "client lagging, dropped samples");
                        continue;
                    }
                    Err(_) => break,
                }
            }
        }
    }
    info!("client disconnected");
}

async fn socketio_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socketio(socket, state))
}

/// Engine.IO open packet for a new session.
fn open_packet(sid: &str) -> String {
    format!(
        r#"0{{"sid":"{}","upgrades":[],"pingInterval":{},"pingTimeout":{},"maxPayload":1000000}}"#,
        sid,
        PING_INTERVAL.as_millis(),
        PING_TIMEOUT.as_millis()
    )
}

/// Socket.IO event packet; `payload` must already be JSON.
fn event_packet(payload: &str) -> String {
    format!(r#"42["{}",{}]"#, TELEMETRY_EVENT, payload)
}

async fn handle_socketio(mut socket: WebSocket, state: AppState) {
    let sid = state.next_sid();
    info!(sid = %sid, "socket.io client connected");

    if socket.send(Message::Text(open_packet(&sid))).await.is_err() {
        return;
    }

    let mut rx = state.tx.subscribe();
    let mut joined = false;
    let mut ping = time::interval_at(Instant::now() + PING_INTERVAL, PING_INTERVAL);

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                if text.starts_with("40") {
                    joined = true;
                    let ack = format!(r#"40{{"sid":"{}-ns"}}"#, sid);
                    if socket.send(Message::Text(ack)).await.is_err() {
                        break;
                    }
                } else if text == "41" || text == "1" {
                    break;
                }
            }
            _ = ping.tick() => {
                if socket.send(Message::Text("2".to_string())).await.is_err() {
                    break;
                }
            }
            frame = rx.recv() => {
                match frame {
                    Ok(payload) if joined => {
                        if socket.send(Message::Text(event_packet(&payload))).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(sid = %sid, skipped, "client lagging, dropped samples");
                    }
                    Err(_) => break,
                }
            }
        }
    }
    info!(sid = %sid, "socket.io client disconnected");
}

/// Generate samples at `rate_hz` and publish them until the process exits.
pub async fn run_emitter(state: AppState, sim: TelemetrySim, rate_hz: f64) {
    let period = Duration::from_secs_f64(1.0 / rate_hz.max(0.01));
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let start = Instant::now();
    let mut sent = 0u64;

    loop {
        ticker.tick().await;
        let sample = sim.sample_at(start.elapsed().as_secs_f64());
        let payload = match serde_json::to_string(&sample) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to encode sample");
                continue;
            }
        };

        // Err only means no client is connected.
        let clients = state.tx.send(payload).unwrap_or(0);
        sent += 1;
        if sent % 100 == 0 {
            debug!(sent, clients, "emitted samples");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_packet_advertises_session() {
        let packet = open_packet("abc");
        assert!(packet.starts_with(r#"0{"sid":"abc""#));
        let body: serde_json::Value = serde_json::from_str(&packet[1..]).unwrap();
        assert_eq!(body["pingInterval"], 25_000);
        assert_eq!(body["upgrades"], serde_json::json!([]));
    }

    #[test]
    fn event_packet_wraps_payload() {
        assert_eq!(
            event_packet(r#"{"alt":50.0}"#),
            r#"42["telemetry_data",{"alt":50.0}]"#
        );
    }

    #[test]
    fn session_ids_are_unique() {
        let state = AppState::new();
        assert_ne!(state.next_sid(), state.next_sid());
    }
}
