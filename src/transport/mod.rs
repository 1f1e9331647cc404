pub mod pusher;
pub mod socket;

pub use socket::{RadarSocket, TransportEvent};

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::config::ServerConfig;
use crate::error::{RadarError, Result};

/// Fetch the public channel credentials from the config endpoint.
pub async fn fetch_server_config(endpoint: &str) -> Result<ServerConfig> {
    let fail = |what: &str, e: wasm_bindgen::JsValue| RadarError::ConfigFetch(format!("{what}: {e:?}"));
    let window = web_sys::window().ok_or_else(|| RadarError::ConfigFetch("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(endpoint))
        .await
        .map_err(|e| fail("request", e))?;
    let resp: web_sys::Response = resp.dyn_into().map_err(|e| fail("response", e))?;
    if !resp.ok() {
        return Err(RadarError::ConfigFetch(format!("HTTP {}", resp.status())));
    }
    let text = JsFuture::from(resp.text().map_err(|e| fail("body", e))?)
        .await
        .map_err(|e| fail("body", e))?
        .as_string()
        .ok_or_else(|| RadarError::ConfigFetch("non-text body".into()))?;
    ServerConfig::from_json(&text)
}
