//! Minimal Pusher Channels (protocol 7) client codec.
//!
//! Every WebSocket text frame is one JSON object
//! `{"event": ..., "channel"?: ..., "data": ...}`. `data` is usually a
//! JSON-encoded *string*; some servers inline an object instead, so both
//! forms are accepted.
//!
//! | Direction       | Event                                               |
//! |-----------------|-----------------------------------------------------|
//! | Server → client | `pusher:connection_established`, `pusher:ping`,      |
//! |                 | `pusher:error`, `pusher_internal:subscription_succeeded`, app events |
//! | Client → server | `pusher:subscribe`, `pusher:pong`                    |

use serde_json::{Value, json};

const PROTOCOL: u8 = 7;
const CLIENT_NAME: &str = "web-radar";

/// WebSocket endpoint for an app key in a cluster.
pub fn socket_url(key: &str, cluster: &str) -> String {
    format!(
        "wss://ws-{cluster}.pusher.com/app/{key}?protocol={PROTOCOL}&client={CLIENT_NAME}&version={}&flash=false",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn subscribe_frame(channel: &str) -> String {
    json!({
        "event": "pusher:subscribe",
        "data": { "channel": channel },
    })
    .to_string()
}

pub fn pong_frame() -> String {
    json!({ "event": "pusher:pong", "data": {} }).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum PusherOp {
    ConnectionEstablished { socket_id: String },
    SubscriptionSucceeded { channel: String },
    Ping,
    Error { message: String, code: Option<i64> },
    /// Application event; `data` is the inner JSON text.
    Event {
        event: String,
        channel: Option<String>,
        data: String,
    },
}

/// Parse one frame. Unknown `pusher:*` control events and garbage yield `None`.
pub fn parse_frame(text: &str) -> Option<PusherOp> {
    let frame: Value = serde_json::from_str(text).ok()?;
    let event = frame.get("event")?.as_str()?;
    let data = frame.get("data").map(inner_data).unwrap_or_default();

    match event {
        "pusher:connection_established" => {
            let inner: Value = serde_json::from_str(&data).ok()?;
            Some(PusherOp::ConnectionEstablished {
                socket_id: inner.get("socket_id")?.as_str()?.to_string(),
            })
        }
        "pusher_internal:subscription_succeeded" => Some(PusherOp::SubscriptionSucceeded {
            channel: frame.get("channel")?.as_str()?.to_string(),
        }),
        "pusher:ping" => Some(PusherOp::Ping),
        "pusher:error" => {
            let inner: Value = serde_json::from_str(&data).unwrap_or(Value::Null);
            Some(PusherOp::Error {
                message: inner
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
                code: inner.get("code").and_then(Value::as_i64),
            })
        }
        e if e.starts_with("pusher:") || e.starts_with("pusher_internal:") => None,
        e => Some(PusherOp::Event {
            event: e.to_string(),
            channel: frame
                .get("channel")
                .and_then(Value::as_str)
                .map(str::to_string),
            data,
        }),
    }
}

fn inner_data(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
