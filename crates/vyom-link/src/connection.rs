//! Connection handle: one persistent link to the telemetry source.
//!
//! [`Connection::open`] spawns the link task and returns the first
//! [`Subscription`]. The task reconnects on its own; subscribers only see
//! `Connected` / `Disconnected` transitions and telemetry.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;
use vyom_core::{LinkEvent, TelemetrySample};

use crate::backoff::Backoff;
use crate::config::{LinkConfig, Protocol};
use crate::error::{FrameError, LinkError};
use crate::frame::{self, EnginePacket, SocketPacket};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Owned handle to the link task. Dropping it stops the task.
pub struct Connection {
    endpoint: Url,
    events: broadcast::Sender<LinkEvent>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

/// Listener for link events. Dropping it unsubscribes.
pub struct Subscription {
    rx: broadcast::Receiver<LinkEvent>,
}

impl Connection {
    /// Start the link task. Must be called inside a Tokio runtime.
    ///
    /// The returned subscription is registered before the task starts, so
    /// it observes the first `Connected` event.
    pub fn open(config: LinkConfig) -> Result<(Self, Subscription), LinkError> {
        let endpoint = endpoint_url(&config)?;
        let (events, rx) = broadcast::channel(config.queue_capacity.max(1));
        let (shutdown, shutdown_rx) = watch::channel(false);

        info!(endpoint = %endpoint, protocol = %config.protocol, "opening telemetry link");
        let task = tokio::spawn(run_link(
            endpoint.clone(),
            config,
            events.clone(),
            shutdown_rx,
        ));

        let connection = Self {
            endpoint,
            events,
            shutdown,
            task: Some(task),
        };
        Ok((connection, Subscription { rx }))
    }

    /// Add a listener. It sees events from now on.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.events.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Stop the link task and wait for it to release the socket.
    pub async fn close(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "link task ended abnormally");
            }
        }
        info!(endpoint = %self.endpoint, "telemetry link closed");
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

impl Subscription {
    /// Next event, or `None` once the connection is closed.
    pub async fn recv(&mut self) -> Option<LinkEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "listener lagging, dropped link events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// WebSocket URL for the configured endpoint and protocol.
pub fn endpoint_url(config: &LinkConfig) -> Result<Url, LinkError> {
    let mut url = Url::parse(&config.endpoint)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(LinkError::Scheme(other.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|_| LinkError::Scheme(scheme.to_string()))?;

    if config.protocol == Protocol::SocketIo {
        if url.path().is_empty() || url.path() == "/" {
            url.set_path("/socket.io/");
        }
        url.query_pairs_mut()
            .append_pair("EIO", "4")
            .append_pair("transport", "websocket");
    }
    Ok(url)
}

async fn run_link(
    endpoint: Url,
    config: LinkConfig,
    events: broadcast::Sender<LinkEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut backoff = Backoff::new(config.reconnect_base, config.reconnect_max);

    loop {
        let mut connected = false;
        let outcome = tokio::select! {
            result = stream_once(&endpoint, &config, &events, &mut connected) => Some(result),
            _ = shutdown.changed() => None,
        };

        if connected {
            info!(endpoint = %endpoint, "link lost");
            let _ = events.send(LinkEvent::Disconnected);
            backoff.reset();
        }

        match outcome {
            None => break,
            Some(Ok(())) => debug!(endpoint = %endpoint, "stream closed by peer"),
            Some(Err(err)) => warn!(endpoint = %endpoint, error = %err, "link error"),
        }

        let delay = backoff.next_delay();
        debug!(?delay, attempt = backoff.attempts(), "reconnecting");
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => break,
        }
    }
}

async fn stream_once(
    endpoint: &Url,
    config: &LinkConfig,
    events: &broadcast::Sender<LinkEvent>,
    connected: &mut bool,
) -> Result<(), LinkError> {
    let (mut socket, _) = connect_async(endpoint.as_str()).await?;

    match config.protocol {
        Protocol::Raw => {
            mark_connected(endpoint, events, connected);
            read_raw(&mut socket, events).await
        }
        Protocol::SocketIo => {
            read_socketio(&mut socket, endpoint, &config.event, events, connected).await
        }
    }
}

fn mark_connected(endpoint: &Url, events: &broadcast::Sender<LinkEvent>, connected: &mut bool) {
    if !*connected {
        *connected = true;
        info!(endpoint = %endpoint, "link established");
        let _ = events.send(LinkEvent::Connected);
    }
}

fn publish(events: &broadcast::Sender<LinkEvent>, payload: Result<TelemetrySample, FrameError>) {
    match payload {
        Ok(sample) => {
            let _ = events.send(LinkEvent::Telemetry(sample));
        }
        Err(err) => debug!(error = %err, "skipping malformed telemetry frame"),
    }
}

/// Text of a data frame; `None` for control frames and undecodable binary.
fn frame_text(msg: Message) -> Option<String> {
    match msg {
        Message::Text(text) => Some(text),
        Message::Binary(data) => String::from_utf8(data).ok(),
        _ => None,
    }
}

async fn read_raw(
    socket: &mut Socket,
    events: &broadcast::Sender<LinkEvent>,
) -> Result<(), LinkError> {
    while let Some(msg) = socket.next().await {
        let msg = msg?;
        if let Message::Close(_) = msg {
            return Ok(());
        }
        let Some(text) = frame_text(msg) else {
            continue;
        };
        publish(events, frame::decode_raw(&text));
    }
    Ok(())
}

async fn read_socketio(
    socket: &mut Socket,
    endpoint: &Url,
    event: &str,
    events: &broadcast::Sender<LinkEvent>,
    connected: &mut bool,
) -> Result<(), LinkError> {
    while let Some(msg) = socket.next().await {
        let msg = msg?;
        if let Message::Close(_) = msg {
            return Ok(());
        }
        let Some(text) = frame_text(msg) else {
            continue;
        };

        let packet = match frame::parse_engine(&text) {
            Ok(packet) => packet,
            Err(err) => {
                debug!(error = %err, "skipping malformed packet");
                continue;
            }
        };

        match packet {
            EnginePacket::Open(_) => socket.send(Message::Text("40".to_string())).await?,
            EnginePacket::Ping(data) => socket.send(Message::Text(format!("3{}", data))).await?,
            EnginePacket::Close => return Ok(()),
            EnginePacket::Message(SocketPacket::Connect) => {
                mark_connected(endpoint, events, connected)
            }
            EnginePacket::Message(SocketPacket::Disconnect) => return Ok(()),
            EnginePacket::Message(SocketPacket::ConnectError(message)) => {
                return Err(LinkError::Handshake(message));
            }
            EnginePacket::Message(SocketPacket::Event { name, payload }) => {
                if name == event {
                    publish(events, frame::decode_sample(payload));
                } else {
                    debug!(event = %name, "ignoring event");
                }
            }
            _ => {}
        }
    }
    Ok(())
}
