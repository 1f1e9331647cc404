//! Client configuration: compile-time defaults, page query overrides and the
//! server-provided channel credentials.

use serde::Deserialize;

use crate::calibration::CalibrationParams;
use crate::error::{RadarError, Result};
use crate::util::query_param;

/// World rectangle the default map raster covers.
const WORLD_MIN_X: f64 = -4000.0;
const WORLD_MAX_X: f64 = 4000.0;
const WORLD_MIN_Y: f64 = -4000.0;
const WORLD_MAX_Y: f64 = 8000.0;
const MAP_RASTER_PX: f64 = 8192.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RadarConfig {
    pub room: String,
    pub debug: bool,
    pub map_image_url: String,
    pub config_endpoint: String,
    pub channel_prefix: String,
    pub update_event: String,
    pub calibration: CalibrationParams,
    pub default_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Wheel sensitivity `k` in `exp(-delta * k)`.
    pub zoom_sensitivity: f64,
    /// Multiplier used by the zoom buttons.
    pub zoom_step: f64,
    /// Used until the map image reports its natural size.
    pub fallback_image_width: f64,
    pub fallback_image_height: f64,
    pub stale_after_ms: f64,
    pub stale_poll_ms: u32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            room: String::new(),
            debug: false,
            map_image_url: "img/map.jpg".into(),
            config_endpoint: "/api/config".into(),
            channel_prefix: "webradar-".into(),
            update_event: "update_map".into(),
            calibration: default_calibration(),
            default_scale: 3.5,
            min_scale: 0.5,
            max_scale: 25.0,
            zoom_sensitivity: 0.002,
            zoom_step: 1.25,
            fallback_image_width: 8000.0,
            fallback_image_height: 8000.0,
            stale_after_ms: 3000.0,
            stale_poll_ms: 500,
        }
    }
}

impl RadarConfig {
    /// Build the config from a `location.search` string such as
    /// `?room=abc&debug=1&offsetX=4100`.
    pub fn from_query(search: &str) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.room = query_param(search, "room")
            .filter(|r| !r.is_empty())
            .ok_or(RadarError::MissingRoom)?;
        cfg.debug = query_param(search, "debug")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);
        if let Some(map) = query_param(search, "map").filter(|m| !m.is_empty()) {
            cfg.map_image_url = map;
        }
        if let Some(v) = query_param(search, "offsetX").and_then(|v| v.parse().ok()) {
            cfg.calibration.set_offset_x(v);
        }
        if let Some(v) = query_param(search, "offsetY").and_then(|v| v.parse().ok()) {
            cfg.calibration.set_offset_y(v);
        }
        Ok(cfg)
    }

    pub fn channel_name(&self) -> String {
        format!("{}{}", self.channel_prefix, self.room)
    }
}

fn default_calibration() -> CalibrationParams {
    CalibrationParams::from_world_bounds(
        WORLD_MIN_X,
        WORLD_MAX_X,
        WORLD_MIN_Y,
        WORLD_MAX_Y,
        MAP_RASTER_PX,
        MAP_RASTER_PX,
    )
    .unwrap_or(CalibrationParams {
        offset_x: MAP_RASTER_PX / 2.0,
        offset_y: MAP_RASTER_PX / 2.0,
        scale_x: 1.0,
        scale_y: 1.0,
        map_pixel_width: MAP_RASTER_PX,
        map_pixel_height: MAP_RASTER_PX,
    })
}

/// Public channel credentials served by the config endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub pusher_key: String,
    pub pusher_cluster: String,
}

impl ServerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        if cfg.pusher_key.is_empty() || cfg.pusher_cluster.is_empty() {
            return Err(RadarError::ConfigFetch("empty pusher key or cluster".into()));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_is_required() {
        assert!(matches!(
            RadarConfig::from_query("?debug=1"),
            Err(RadarError::MissingRoom)
        ));
        assert!(matches!(
            RadarConfig::from_query("?room="),
            Err(RadarError::MissingRoom)
        ));
    }

    #[test]
    fn query_overrides_defaults() {
        let cfg = RadarConfig::from_query("?room=lobby%201&debug=1&offsetX=4100.5&map=big.png")
            .unwrap();
        assert_eq!(cfg.room, "lobby 1");
        assert!(cfg.debug);
        assert_eq!(cfg.map_image_url, "big.png");
        assert_eq!(cfg.calibration.offset_x, 4100.5);
        assert_eq!(cfg.channel_name(), "webradar-lobby 1");
    }

    #[test]
    fn bad_offsets_are_ignored() {
        let cfg = RadarConfig::from_query("?room=a&offsetY=abc").unwrap();
        assert_eq!(cfg.calibration, RadarConfig::default().calibration);
    }

    #[test]
    fn default_calibration_spans_world_bounds() {
        let c = RadarConfig::default().calibration;
        let (u, v) = c.world_to_map_fraction(WORLD_MIN_X, WORLD_MAX_Y);
        assert!(u.abs() < 1e-9 && v.abs() < 1e-9);
        assert!((c.offset_x - 4096.0).abs() < 1e-9);
    }

    #[test]
    fn server_config_parses_camel_case() {
        let cfg = ServerConfig::from_json(r#"{"pusherKey":"abc","pusherCluster":"eu"}"#).unwrap();
        assert_eq!(cfg.pusher_key, "abc");
        assert_eq!(cfg.pusher_cluster, "eu");
        assert!(ServerConfig::from_json(r#"{"pusherKey":"","pusherCluster":"eu"}"#).is_err());
        assert!(ServerConfig::from_json("{}").is_err());
    }
}
