//! Browser WebSocket connection to the Pusher channel carrying radar updates.
//!
//! The socket callbacks decode frames on the spot and forward
//! [`TransportEvent`]s to a yew `Callback`; WASM is single-threaded so there
//! is no queue in between.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::Callback;

use super::pusher::{self, PusherOp};
use crate::config::{RadarConfig, ServerConfig};
use crate::error::{RadarError, Result};
use crate::model::Snapshot;

#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connecting,
    Connected,
    Disconnected,
    Error(String),
    Snapshot(Snapshot),
}

/// Owns the socket; dropping it detaches the callbacks and closes the
/// connection.
pub struct RadarSocket {
    ws: web_sys::WebSocket,
    _onopen: Closure<dyn FnMut()>,
    _onmessage: Closure<dyn FnMut(web_sys::MessageEvent)>,
    _onerror: Closure<dyn FnMut(web_sys::Event)>,
    _onclose: Closure<dyn FnMut(web_sys::CloseEvent)>,
}

impl RadarSocket {
    pub fn open(
        cfg: &RadarConfig,
        server: &ServerConfig,
        on_event: Callback<TransportEvent>,
    ) -> Result<Self> {
        let url = pusher::socket_url(&server.pusher_key, &server.pusher_cluster);
        let ws = web_sys::WebSocket::new(&url)
            .map_err(|e| RadarError::Socket(format!("{e:?}")))?;
        on_event.emit(TransportEvent::Connecting);

        let onopen = Closure::<dyn FnMut()>::new(move || {
            log::debug!("socket open, waiting for connection_established");
        });
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

        let onmessage = {
            let ws = ws.clone();
            let on_event = on_event.clone();
            let subscribed = cfg.channel_name();
            let update_event = cfg.update_event.clone();
            Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |ev: web_sys::MessageEvent| {
                let Some(text) = ev.data().as_string() else {
                    return;
                };
                match pusher::parse_frame(&text) {
                    Some(PusherOp::ConnectionEstablished { socket_id }) => {
                        log::info!("connected as {socket_id}, subscribing to {subscribed}");
                        let sent = ws
                            .send_with_str(&pusher::subscribe_frame(&subscribed))
                            .map_err(|e| format!("{e:?}"));
                        if let Some(ev) = after_send("subscribe", sent, Some(TransportEvent::Connected)) {
                            on_event.emit(ev);
                        }
                    }
                    Some(PusherOp::SubscriptionSucceeded { channel }) => {
                        log::info!("subscribed to {channel}");
                    }
                    Some(PusherOp::Ping) => {
                        let sent = ws
                            .send_with_str(&pusher::pong_frame())
                            .map_err(|e| format!("{e:?}"));
                        if let Some(ev) = after_send("pong", sent, None) {
                            on_event.emit(ev);
                        }
                    }
                    Some(PusherOp::Error { message, code }) => {
                        log::error!("pusher error {code:?}: {message}");
                        on_event.emit(TransportEvent::Error("Error".into()));
                    }
                    Some(PusherOp::Event {
                        event,
                        channel,
                        data,
                    }) if event == update_event
                        && channel.as_deref().is_none_or(|c| c == subscribed) =>
                    {
                        match Snapshot::from_payload(&data) {
                            Ok(snapshot) => on_event.emit(TransportEvent::Snapshot(snapshot)),
                            Err(err) => log::warn!("dropping update: {err}"),
                        }
                    }
                    Some(PusherOp::Event { event, .. }) => {
                        log::debug!("ignoring event {event}");
                    }
                    None => {}
                }
            })
        };
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let onerror = {
            let on_event = on_event.clone();
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
                log::error!("socket error");
                on_event.emit(TransportEvent::Error("Error".into()));
            })
        };
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let onclose = Closure::<dyn FnMut(web_sys::CloseEvent)>::new(
            move |ev: web_sys::CloseEvent| {
                log::info!("socket closed ({}): {}", ev.code(), ev.reason());
                on_event.emit(TransportEvent::Disconnected);
            },
        );
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        Ok(Self {
            ws,
            _onopen: onopen,
            _onmessage: onmessage,
            _onerror: onerror,
            _onclose: onclose,
        })
    }
}

/// What to report after sending a control frame: `on_ok` on success, a
/// connection error otherwise.
fn after_send(
    what: &str,
    sent: std::result::Result<(), String>,
    on_ok: Option<TransportEvent>,
) -> Option<TransportEvent> {
    match sent {
        Ok(()) => on_ok,
        Err(err) => {
            log::error!("failed to send {what}: {err}");
            Some(TransportEvent::Error("Error".into()))
        }
    }
}

impl Drop for RadarSocket {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_subscribe_reports_error_instead_of_connected() {
        assert!(matches!(
            after_send("subscribe", Ok(()), Some(TransportEvent::Connected)),
            Some(TransportEvent::Connected)
        ));
        match after_send("subscribe", Err("closed".into()), Some(TransportEvent::Connected)) {
            Some(TransportEvent::Error(msg)) => assert_eq!(msg, "Error"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn pong_is_silent_unless_it_fails() {
        assert!(after_send("pong", Ok(()), None).is_none());
        assert!(matches!(
            after_send("pong", Err("closed".into()), None),
            Some(TransportEvent::Error(_))
        ));
    }
}
