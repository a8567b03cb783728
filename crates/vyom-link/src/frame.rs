//! Inbound frame decoding for the raw and Socket.IO protocols.

use serde_json::Value;
use vyom_core::TelemetrySample;

use crate::error::FrameError;

/// Engine.IO v4 packet (one WebSocket text frame).
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    /// `0{...}` handshake data
    Open(String),
    Close,
    /// `2` with optional payload echoed in the pong
    Ping(String),
    Pong,
    Message(SocketPacket),
    Upgrade,
    Noop,
}

/// Socket.IO v5 packet carried inside an Engine.IO message.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect,
    Disconnect,
    Event { name: String, payload: Value },
    ConnectError(String),
    /// Acks and binary packets; not used by telemetry
    Other(u8),
}

pub fn parse_engine(text: &str) -> Result<EnginePacket, FrameError> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| FrameError::Packet("empty frame".to_string()))?;
    let body = chars.as_str();

    match kind {
        '0' => Ok(EnginePacket::Open(body.to_string())),
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping(body.to_string())),
        '3' => Ok(EnginePacket::Pong),
        '4' => parse_socket(body).map(EnginePacket::Message),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(FrameError::Packet(format!("unknown engine packet type '{}'", other))),
    }
}

fn parse_socket(body: &str) -> Result<SocketPacket, FrameError> {
    let mut chars = body.chars();
    let kind = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| FrameError::Packet(format!("bad socket packet '{}'", body)))?;
    let mut rest = chars.as_str();

    // Optional "/namespace," prefix.
    if rest.starts_with('/') {
        rest = match rest.find(',') {
            Some(idx) => &rest[idx + 1..],
            None => "",
        };
    }

    // Optional ack id.
    rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());

    match kind {
        0 => Ok(SocketPacket::Connect),
        1 => Ok(SocketPacket::Disconnect),
        2 => {
            let args: Vec<Value> = serde_json::from_str(rest)?;
            let mut args = args.into_iter();
            let name = match args.next() {
                Some(Value::String(name)) => name,
                _ => return Err(FrameError::Packet("event without a name".to_string())),
            };
            let payload = args.next().unwrap_or(Value::Null);
            Ok(SocketPacket::Event { name, payload })
        }
        4 => Ok(SocketPacket::ConnectError(connect_error_message(rest))),
        other => Ok(SocketPacket::Other(other as u8)),
    }
}

fn connect_error_message(rest: &str) -> String {
    serde_json::from_str::<Value>(rest)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| rest.to_string())
}

/// Decode a telemetry payload. Only JSON objects are accepted.
pub fn decode_sample(value: Value) -> Result<TelemetrySample, FrameError> {
    if !value.is_object() {
        return Err(FrameError::Packet("telemetry payload is not an object".to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

/// Decode a raw-protocol text frame.
pub fn decode_raw(text: &str) -> Result<TelemetrySample, FrameError> {
    let value: Value = serde_json::from_str(text)?;
    decode_sample(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_engine_control_packets() {
        assert_eq!(
            parse_engine(r#"0{"sid":"abc"}"#).unwrap(),
            EnginePacket::Open(r#"{"sid":"abc"}"#.to_string())
        );
        assert_eq!(parse_engine("2").unwrap(), EnginePacket::Ping(String::new()));
        assert_eq!(parse_engine("1").unwrap(), EnginePacket::Close);
        assert!(parse_engine("").is_err());
        assert!(parse_engine("9").is_err());
    }

    #[test]
    fn parses_namespace_connect_ack() {
        assert_eq!(
            parse_engine(r#"40{"sid":"xyz"}"#).unwrap(),
            EnginePacket::Message(SocketPacket::Connect)
        );
        assert_eq!(
            parse_engine("41").unwrap(),
            EnginePacket::Message(SocketPacket::Disconnect)
        );
    }

    #[test]
    fn parses_event_with_namespace_and_ack_id() {
        let packet = parse_engine(r#"42/drone,7["telemetry_data",{"lat":12.9}]"#).unwrap();
        assert_eq!(
            packet,
            EnginePacket::Message(SocketPacket::Event {
                name: "telemetry_data".to_string(),
                payload: json!({"lat": 12.9}),
            })
        );
    }

    #[test]
    fn connect_error_message_is_extracted() {
        assert_eq!(
            parse_engine(r#"44{"message":"Not authorized"}"#).unwrap(),
            EnginePacket::Message(SocketPacket::ConnectError("Not authorized".to_string()))
        );
    }

    #[test]
    fn raw_frame_ignores_extra_fields() {
        let sample = decode_raw(
            r#"{"lat":12.97,"lon":77.59,"alt":50,"heading":0,"speed":22.5,"battery":99,"mode":"FLYING (GO-LANG)"}"#,
        )
        .unwrap();
        assert_eq!(sample.lat, Some(12.97));
        assert_eq!(sample.battery, Some(99.0));
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        assert!(decode_raw("[1, 2, 3]").is_err());
        assert!(decode_raw("\"hello\"").is_err());
        assert!(decode_raw("{not json").is_err());
    }

    #[test]
    fn mistyped_field_keeps_the_rest_of_the_frame() {
        let sample = decode_raw(r#"{"lat":12.9,"lon":77.6,"alt":100,"battery":"80"}"#).unwrap();
        assert_eq!(sample.lat, Some(12.9));
        assert_eq!(sample.lon, Some(77.6));
        assert_eq!(sample.alt, Some(100.0));
        assert_eq!(sample.battery, None);

        let sample = decode_sample(json!({"alt": "high", "speed": 4})).unwrap();
        assert_eq!(sample.alt, None);
        assert_eq!(sample.speed, Some(4.0));
    }
}
