//! Core data model for the radar: entity snapshots, markers and the reducer
//! that owns calibration, snapshot and camera state.
//!
//! Every input (socket update, pointer, wheel, follow selection, layout) is a
//! [`RadarAction`]; [`RadarState::apply`] is the single place that mutates
//! state. Components dispatch actions and only read the outputs
//! ([`RadarState::transform`], [`RadarState::markers`],
//! [`RadarState::followable_targets`]).

use serde_json::Value;
use std::rc::Rc;
use yew::Reducible;

use crate::calibration::CalibrationParams;
use crate::config::RadarConfig;
use crate::error::{RadarError, Result};
use crate::state::{Camera, FollowTarget, StalenessTracker, Transform};

/// Health strictly below this (and above zero) is drawn as "low".
pub const LOW_HEALTH: f64 = 50.0;

/// Id reserved by the sender; never offered as a follow target.
pub const RESERVED_ID: &str = "0";

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub health: Option<f64>,
    pub name: Option<String>,
    /// Explicit local-viewer tag. When no entity carries it, index 0 is local.
    pub is_local: Option<bool>,
}

impl Entity {
    /// Lenient decode of one `peds[]` record. Returns `None` when the id or
    /// a coordinate is missing or not a finite number.
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = match value.get("id")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let x = finite(value.get("x")?)?;
        let y = finite(value.get("y")?)?;
        let health = value.get("health").and_then(finite);
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let is_local = value
            .get("isLocal")
            .or_else(|| value.get("is_local"))
            .and_then(Value::as_bool);
        Some(Self {
            id,
            x,
            y,
            health,
            name,
            is_local,
        })
    }

    pub fn marker_state(&self) -> MarkerState {
        match self.health {
            None => MarkerState::Normal,
            Some(h) if h <= 0.0 => MarkerState::Dead,
            Some(h) if h < LOW_HEALTH => MarkerState::Low,
            Some(_) => MarkerState::Normal,
        }
    }
}

fn finite(v: &Value) -> Option<f64> {
    v.as_f64().filter(|f| f.is_finite())
}

/// Entities of one update tick, in sender order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub entities: Vec<Entity>,
}

impl Snapshot {
    /// Decode an `update_map` payload of the form `{ "peds": [...] }`.
    /// Malformed records are dropped individually.
    pub fn from_payload(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let peds = value
            .get("peds")
            .and_then(Value::as_array)
            .ok_or_else(|| RadarError::InvalidPayload("expected { peds: [...] }".into()))?;
        let mut entities = Vec::with_capacity(peds.len());
        for (i, raw) in peds.iter().enumerate() {
            match Entity::from_value(raw) {
                Some(e) => entities.push(e),
                None => log::warn!("skipping malformed entity at index {i}"),
            }
        }
        Ok(Self { entities })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerState {
    Normal,
    Low,
    Dead,
}

impl MarkerState {
    pub fn css_class(&self) -> &'static str {
        match self {
            MarkerState::Normal => "",
            MarkerState::Low => "low-hp",
            MarkerState::Dead => "dead",
        }
    }
}

/// Where and how to draw one blip; `u`/`v` are raster fractions.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: String,
    pub u: f64,
    pub v: f64,
    pub state: MarkerState,
    pub label: Option<String>,
    pub is_local: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowOption {
    pub id: String,
    pub name: String,
}

/// Latest snapshot only; replaced wholesale, never diffed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotModel {
    current: Rc<Snapshot>,
}

impl SnapshotModel {
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.current = Rc::new(snapshot);
    }

    pub fn count(&self) -> usize {
        self.current.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.current.entities
    }

    pub fn local_index(&self) -> Option<usize> {
        if self.current.entities.is_empty() {
            return None;
        }
        self.current
            .entities
            .iter()
            .position(|e| e.is_local == Some(true))
            .or(Some(0))
    }

    pub fn local_entity(&self) -> Option<&Entity> {
        self.local_index().map(|i| &self.current.entities[i])
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Entity> {
        self.current.entities.iter().find(|e| e.id == id)
    }

    pub fn selectable_follow_targets(&self) -> Vec<&Entity> {
        let local = self.local_index();
        self.current
            .entities
            .iter()
            .enumerate()
            .filter(|(i, e)| Some(*i) != local && e.id != RESERVED_ID && e.name.is_some())
            .map(|(_, e)| e)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
    Error(String),
}

impl ConnectionStatus {
    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Connecting => "Connecting...".into(),
            ConnectionStatus::Connected => "Connected".into(),
            ConnectionStatus::Disconnected => "Disconnected".into(),
            ConnectionStatus::Error(msg) => msg.clone(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected | ConnectionStatus::Error(_) => "disconnected",
        }
    }
}

// ---------------- Reducer & Actions -----------------
#[derive(Clone, Debug)]
pub enum RadarAction {
    Snapshot { snapshot: Snapshot, now_ms: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { delta_y: f64, cursor_x: f64, cursor_y: f64 },
    /// Button zoom about the viewport center.
    ZoomStep { zoom_in: bool },
    FollowTargetChanged(FollowTarget),
    RecenterRequested,
    ViewportResized { width: f64, height: f64 },
    ImageLoaded { width: f64, height: f64 },
    Connection(ConnectionStatus),
    Tick { now_ms: f64 },
    SetOffsetX(f64),
    SetOffsetY(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadarState {
    pub calibration: CalibrationParams,
    pub snapshot: SnapshotModel,
    pub camera: Camera,
    pub connection: ConnectionStatus,
    pub staleness: StalenessTracker,
    pub zoom_step: f64,
    /// Bumped on every reduced action.
    pub version: u64,
}

impl RadarState {
    pub fn new(cfg: &RadarConfig) -> Self {
        Self {
            calibration: cfg.calibration,
            snapshot: SnapshotModel::default(),
            camera: Camera::new(cfg),
            connection: ConnectionStatus::Connecting,
            staleness: StalenessTracker::new(cfg.stale_after_ms),
            zoom_step: cfg.zoom_step,
            version: 0,
        }
    }

    pub fn apply(&mut self, action: RadarAction) {
        match action {
            RadarAction::Snapshot { snapshot, now_ms } => {
                self.staleness.record(now_ms);
                self.snapshot.apply_snapshot(snapshot);
                if self.snapshot.count() == 0 {
                    return;
                }
                self.reconcile_follow();
                if self.camera.is_tracking() {
                    self.recenter();
                }
            }
            RadarAction::PointerDown { x, y } => self.camera.begin_drag(x, y),
            RadarAction::PointerMove { x, y } => {
                if self.camera.drag_to(x, y) {
                    log::debug!("drag started, tracking suspended");
                }
            }
            RadarAction::PointerUp => self.camera.end_drag(),
            RadarAction::Wheel {
                delta_y,
                cursor_x,
                cursor_y,
            } => {
                if self.camera.zoom_at(cursor_x, cursor_y, delta_y) {
                    log::debug!("wheel zoom, tracking suspended");
                }
            }
            RadarAction::ZoomStep { zoom_in } => {
                self.camera.disable_tracking();
                let factor = if zoom_in {
                    self.zoom_step
                } else {
                    1.0 / self.zoom_step
                };
                let cx = self.camera.viewport_width / 2.0;
                let cy = self.camera.viewport_height / 2.0;
                self.camera.zoom_by(cx, cy, factor);
            }
            RadarAction::FollowTargetChanged(target) => {
                log::info!("following {}", target.key());
                self.camera.followed = target;
                self.reconcile_follow();
                self.camera.enable_tracking();
                self.recenter();
            }
            RadarAction::RecenterRequested => {
                self.camera.enable_tracking();
                self.recenter();
            }
            RadarAction::ViewportResized { width, height } => {
                self.camera.set_viewport(width, height);
                self.layout();
            }
            RadarAction::ImageLoaded { width, height } => {
                self.camera.set_image_size(width, height);
                self.layout();
            }
            RadarAction::Connection(status) => {
                if status != self.connection {
                    log::info!("connection: {}", status.label());
                }
                self.connection = status;
            }
            RadarAction::Tick { now_ms } => {
                if self.staleness.check(now_ms) {
                    log::warn!(
                        "no update for {} ms, positions are stale",
                        self.staleness.stale_after_ms
                    );
                }
            }
            RadarAction::SetOffsetX(v) => {
                self.calibration.set_offset_x(v);
                log::info!("calibration offset_x = {}", self.calibration.offset_x);
                if self.camera.is_tracking() {
                    self.recenter();
                }
            }
            RadarAction::SetOffsetY(v) => {
                self.calibration.set_offset_y(v);
                log::info!("calibration offset_y = {}", self.calibration.offset_y);
                if self.camera.is_tracking() {
                    self.recenter();
                }
            }
        }
    }

    /// First layout places the whole raster in view; afterwards a tracking
    /// camera keeps its target centered.
    fn layout(&mut self) {
        let cam = &mut self.camera;
        if !cam.initialized && cam.viewport_width > 0.0 && cam.viewport_height > 0.0 {
            cam.layout_default();
        }
        if cam.initialized && cam.is_tracking() {
            self.recenter();
        }
    }

    fn reconcile_follow(&mut self) {
        if let FollowTarget::Entity(id) = &self.camera.followed {
            if self.snapshot.count() > 0 && self.snapshot.find_by_id(id).is_none() {
                log::info!("follow target {id} left, falling back to local");
                self.camera.followed = FollowTarget::Local;
            }
        }
    }

    fn recenter(&mut self) {
        let target = match &self.camera.followed {
            FollowTarget::Local => self.snapshot.local_entity(),
            FollowTarget::Entity(id) => self
                .snapshot
                .find_by_id(id)
                .or_else(|| self.snapshot.local_entity()),
        };
        if let Some(e) = target {
            let (u, v) = self.calibration.world_to_map_fraction(e.x, e.y);
            self.camera.center_on(u, v);
        }
    }

    pub fn transform(&self) -> Transform {
        self.camera.transform()
    }

    pub fn markers(&self) -> Vec<Marker> {
        let local = self.snapshot.local_index();
        self.snapshot
            .entities()
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let (u, v) = self.calibration.world_to_map_fraction(e.x, e.y);
                Marker {
                    id: e.id.clone(),
                    u,
                    v,
                    state: e.marker_state(),
                    label: e.name.clone(),
                    is_local: local == Some(i),
                }
            })
            .collect()
    }

    pub fn followable_targets(&self) -> Vec<FollowOption> {
        self.snapshot
            .selectable_follow_targets()
            .into_iter()
            .map(|e| FollowOption {
                id: e.id.clone(),
                name: e.name.clone().unwrap_or_default(),
            })
            .collect()
    }
}

impl Reducible for RadarState {
    type Action = RadarAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        new.apply(action);
        new.version = new.version.wrapping_add(1);
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CameraMode;

    const EPS: f64 = 1e-6;

    fn scenario_config() -> RadarConfig {
        RadarConfig {
            calibration: CalibrationParams {
                offset_x: 4096.0,
                offset_y: 4096.0,
                scale_x: 0.5,
                scale_y: 0.5,
                map_pixel_width: 8192.0,
                map_pixel_height: 8192.0,
            },
            ..RadarConfig::default()
        }
    }

    fn state() -> RadarState {
        let mut s = RadarState::new(&scenario_config());
        s.apply(RadarAction::ViewportResized {
            width: 1280.0,
            height: 720.0,
        });
        s
    }

    fn snap(json: &str) -> RadarAction {
        RadarAction::Snapshot {
            snapshot: Snapshot::from_payload(json).unwrap(),
            now_ms: 0.0,
        }
    }

    const BOB: &str = r#"{"peds":[{"id":"0","x":0,"y":0},{"id":"5","name":"Bob","x":100,"y":100,"health":30}]}"#;

    fn followed_screen_pos(s: &RadarState, id: &str) -> (f64, f64) {
        let e = s.snapshot.find_by_id(id).unwrap();
        let (u, v) = s.calibration.world_to_map_fraction(e.x, e.y);
        let (iw, ih) = s.camera.image_size();
        s.camera.raster_to_screen(u * iw, v * ih)
    }

    #[test]
    fn marker_scenario() {
        let mut s = state();
        s.apply(snap(BOB));
        let markers = s.markers();
        assert_eq!(markers.len(), 2);
        assert!((markers[0].u - 0.5).abs() < EPS && (markers[0].v - 0.5).abs() < EPS);
        assert!(markers[0].is_local);
        assert_eq!(markers[0].state, MarkerState::Normal);
        assert!((markers[1].u - 4146.0 / 8192.0).abs() < EPS);
        assert!((markers[1].v - 4046.0 / 8192.0).abs() < EPS);
        assert_eq!(markers[1].state, MarkerState::Low);
        assert_eq!(markers[1].label.as_deref(), Some("Bob"));
        assert!(!markers[1].is_local);
    }

    #[test]
    fn health_states() {
        let e = |h: Option<f64>| Entity {
            id: "1".into(),
            x: 0.0,
            y: 0.0,
            health: h,
            name: None,
            is_local: None,
        };
        assert_eq!(e(None).marker_state(), MarkerState::Normal);
        assert_eq!(e(Some(0.0)).marker_state(), MarkerState::Dead);
        assert_eq!(e(Some(-5.0)).marker_state(), MarkerState::Dead);
        assert_eq!(e(Some(49.9)).marker_state(), MarkerState::Low);
        assert_eq!(e(Some(50.0)).marker_state(), MarkerState::Normal);
    }

    #[test]
    fn malformed_entities_are_skipped() {
        let s = Snapshot::from_payload(
            r#"{"peds":[{"id":"1","x":"a","y":0},{"id":2,"x":1.5,"y":-2},{"x":1,"y":1},{"id":"3","y":4}]}"#,
        )
        .unwrap();
        assert_eq!(s.entities.len(), 1);
        assert_eq!(s.entities[0].id, "2");
    }

    #[test]
    fn payload_without_peds_is_rejected() {
        assert!(matches!(
            Snapshot::from_payload(r#"{"players":[]}"#),
            Err(RadarError::InvalidPayload(_))
        ));
        assert!(matches!(
            Snapshot::from_payload("not json"),
            Err(RadarError::Json(_))
        ));
    }

    #[test]
    fn selectable_targets_exclude_local_reserved_and_unnamed() {
        let mut m = SnapshotModel::default();
        m.apply_snapshot(
            Snapshot::from_payload(
                r#"{"peds":[
                    {"id":"9","name":"Me","x":0,"y":0},
                    {"id":"0","name":"Reserved","x":0,"y":0},
                    {"id":"4","x":0,"y":0},
                    {"id":"7","name":"","x":0,"y":0},
                    {"id":"3","name":"Ann","x":0,"y":0},
                    {"id":"1","name":"Zed","x":0,"y":0}
                ]}"#,
            )
            .unwrap(),
        );
        let ids: Vec<&str> = m
            .selectable_follow_targets()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert_eq!(m.local_entity().map(|e| e.id.as_str()), Some("9"));
    }

    #[test]
    fn explicit_local_tag_wins_over_position() {
        let mut s = state();
        s.apply(snap(
            r#"{"peds":[{"id":"2","name":"Other","x":50,"y":50},{"id":"8","name":"Me","x":0,"y":0,"isLocal":true}]}"#,
        ));
        assert_eq!(s.snapshot.local_entity().unwrap().id, "8");
        let targets = s.followable_targets();
        assert_eq!(targets, vec![FollowOption { id: "2".into(), name: "Other".into() }]);
        let (sx, sy) = followed_screen_pos(&s, "8");
        assert!((sx - 640.0).abs() < EPS && (sy - 360.0).abs() < EPS);
    }

    #[test]
    fn tracking_centers_local_on_every_snapshot() {
        let mut s = state();
        for (x, y) in [(0.0, 0.0), (1234.5, -987.0), (-3000.0, 5000.0)] {
            s.apply(snap(&format!(r#"{{"peds":[{{"id":"0","x":{x},"y":{y}}}]}}"#)));
            let (sx, sy) = followed_screen_pos(&s, "0");
            assert!((sx - 640.0).abs() < EPS && (sy - 360.0).abs() < EPS);
        }
    }

    #[test]
    fn tracking_survives_zoom_changes_after_recenter() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::Wheel {
            delta_y: -300.0,
            cursor_x: 10.0,
            cursor_y: 10.0,
        });
        assert_eq!(s.camera.mode, CameraMode::Manual);
        s.apply(RadarAction::RecenterRequested);
        assert_eq!(s.camera.mode, CameraMode::Tracking);
        let (sx, sy) = followed_screen_pos(&s, "0");
        assert!((sx - 640.0).abs() < EPS && (sy - 360.0).abs() < EPS);
    }

    #[test]
    fn manual_mode_ignores_snapshots() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::PointerDown { x: 100.0, y: 100.0 });
        s.apply(RadarAction::PointerMove { x: 140.0, y: 90.0 });
        s.apply(RadarAction::PointerUp);
        let before = s.transform();
        s.apply(snap(r#"{"peds":[{"id":"0","x":900,"y":900}]}"#));
        assert_eq!(s.transform(), before);
        assert_eq!(s.camera.mode, CameraMode::Manual);
    }

    #[test]
    fn pointer_down_alone_keeps_tracking() {
        let mut s = state();
        s.apply(RadarAction::PointerDown { x: 1.0, y: 1.0 });
        s.apply(RadarAction::PointerUp);
        s.apply(RadarAction::PointerMove { x: 50.0, y: 1.0 });
        assert_eq!(s.camera.mode, CameraMode::Tracking);
    }

    #[test]
    fn following_a_target_centers_it() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::Wheel {
            delta_y: 120.0,
            cursor_x: 5.0,
            cursor_y: 5.0,
        });
        s.apply(RadarAction::FollowTargetChanged(FollowTarget::Entity("5".into())));
        assert_eq!(s.camera.mode, CameraMode::Tracking);
        assert_eq!(s.camera.followed, FollowTarget::Entity("5".into()));
        let (sx, sy) = followed_screen_pos(&s, "5");
        assert!((sx - 640.0).abs() < EPS && (sy - 360.0).abs() < EPS);
    }

    #[test]
    fn followed_target_stays_centered_across_snapshots() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::FollowTargetChanged(FollowTarget::Entity("5".into())));
        for (x, y) in [(-2500.0, 300.0), (4000.0, 7999.0)] {
            s.apply(snap(&format!(
                r#"{{"peds":[{{"id":"0","x":0,"y":0}},{{"id":"5","name":"Bob","x":{x},"y":{y}}}]}}"#
            )));
            assert_eq!(s.camera.mode, CameraMode::Tracking);
            let (sx, sy) = followed_screen_pos(&s, "5");
            assert!((sx - 640.0).abs() < EPS && (sy - 360.0).abs() < EPS);
        }
    }

    #[test]
    fn duplicate_ids_each_get_a_marker() {
        let mut s = state();
        s.apply(snap(
            r#"{"peds":[{"id":"0","x":0,"y":0},{"id":"0","x":100,"y":0},{"id":"0","x":-100,"y":0,"health":0}]}"#,
        ));
        let markers = s.markers();
        assert_eq!(markers.len(), 3);
        assert_eq!(markers.iter().filter(|m| m.is_local).count(), 1);
        assert!(markers[0].is_local);
        assert!(markers[1].u > markers[0].u && markers[2].u < markers[0].u);
        assert_eq!(markers[2].state, MarkerState::Dead);
        assert!(s.followable_targets().is_empty());

        s.apply(snap(r#"{"peds":[{"id":"0","x":-100,"y":0},{"id":"0","x":0,"y":0}]}"#));
        assert_eq!(s.markers().len(), 2);
    }

    #[test]
    fn entity_with_local_like_id_can_be_followed() {
        let mut s = state();
        s.apply(snap(
            r#"{"peds":[{"id":"0","x":0,"y":0},{"id":"local","name":"L","x":300,"y":-200}]}"#,
        ));
        let option = &s.followable_targets()[0];
        let key = FollowTarget::Entity(option.id.clone()).key();
        s.apply(RadarAction::FollowTargetChanged(FollowTarget::from_key(&key)));
        assert_eq!(s.camera.followed, FollowTarget::Entity("local".into()));
        let (sx, sy) = followed_screen_pos(&s, "local");
        assert!((sx - 640.0).abs() < EPS && (sy - 360.0).abs() < EPS);
    }

    #[test]
    fn huge_wheel_deltas_clamp_scale() {
        let mut s = state();
        s.apply(RadarAction::Wheel {
            delta_y: -400_000.0,
            cursor_x: 640.0,
            cursor_y: 360.0,
        });
        assert_eq!(s.camera.scale, 25.0);
        assert_eq!(s.camera.mode, CameraMode::Manual);
        s.apply(RadarAction::Wheel {
            delta_y: 400_000.0,
            cursor_x: 640.0,
            cursor_y: 360.0,
        });
        assert_eq!(s.camera.scale, 0.5);
    }

    #[test]
    fn vanished_target_falls_back_to_local() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::FollowTargetChanged(FollowTarget::Entity("5".into())));
        s.apply(RadarAction::Wheel {
            delta_y: 10.0,
            cursor_x: 0.0,
            cursor_y: 0.0,
        });
        s.apply(snap(r#"{"peds":[{"id":"0","x":10,"y":10}]}"#));
        assert_eq!(s.camera.followed, FollowTarget::Local);
        assert_eq!(s.camera.mode, CameraMode::Manual);
    }

    #[test]
    fn empty_snapshot_keeps_camera_and_follow() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::FollowTargetChanged(FollowTarget::Entity("5".into())));
        let before = s.transform();
        s.apply(snap(r#"{"peds":[]}"#));
        assert_eq!(s.transform(), before);
        assert_eq!(s.camera.followed, FollowTarget::Entity("5".into()));
        assert!(s.markers().is_empty());
        assert_eq!(s.snapshot.count(), 0);
    }

    #[test]
    fn first_layout_centers_whole_raster() {
        let mut s = RadarState::new(&scenario_config());
        s.apply(RadarAction::ImageLoaded {
            width: 8192.0,
            height: 8192.0,
        });
        assert!(!s.camera.initialized);
        assert_eq!(s.transform().pan_x, 0.0);
        s.apply(RadarAction::ViewportResized {
            width: 1000.0,
            height: 800.0,
        });
        assert!(s.camera.initialized);
        assert_eq!(s.transform().pan_x, 500.0 - 8192.0 * 3.5 / 2.0);
        assert_eq!(s.transform().pan_y, 400.0 - 8192.0 * 3.5 / 2.0);
    }

    #[test]
    fn image_load_rescales_tracked_position() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::ImageLoaded {
            width: 4096.0,
            height: 4096.0,
        });
        let (sx, sy) = followed_screen_pos(&s, "0");
        assert!((sx - 640.0).abs() < EPS && (sy - 360.0).abs() < EPS);
    }

    #[test]
    fn zoom_buttons_zoom_about_center() {
        let mut s = state();
        let before = s.camera.screen_to_raster(640.0, 360.0);
        s.apply(RadarAction::ZoomStep { zoom_in: true });
        let after = s.camera.screen_to_raster(640.0, 360.0);
        assert!((s.camera.scale - 3.5 * 1.25).abs() < EPS);
        assert!((before.0 - after.0).abs() < EPS && (before.1 - after.1).abs() < EPS);
        assert_eq!(s.camera.mode, CameraMode::Manual);
    }

    #[test]
    fn offset_tuning_moves_markers_and_recenters() {
        let mut s = state();
        s.apply(snap(BOB));
        s.apply(RadarAction::SetOffsetX(4096.0 + 819.2));
        assert!((s.markers()[0].u - 0.6).abs() < EPS);
        let (sx, _) = followed_screen_pos(&s, "0");
        assert!((sx - 640.0).abs() < EPS);
    }

    #[test]
    fn staleness_is_driven_by_ticks() {
        let mut s = state();
        s.apply(RadarAction::Snapshot {
            snapshot: Snapshot::from_payload(BOB).unwrap(),
            now_ms: 1_000.0,
        });
        s.apply(RadarAction::Tick { now_ms: 2_000.0 });
        assert!(!s.staleness.is_stale());
        s.apply(RadarAction::Tick { now_ms: 4_000.0 });
        assert!(s.staleness.is_stale());
        assert_eq!(s.markers().len(), 2);
    }

    #[test]
    fn connection_errors_leave_markers_alone() {
        let mut s = state();
        s.apply(snap(BOB));
        let before = s.transform();
        s.apply(RadarAction::Connection(ConnectionStatus::Error("Error".into())));
        assert_eq!(s.connection.css_class(), "disconnected");
        assert_eq!(s.markers().len(), 2);
        assert_eq!(s.transform(), before);
    }

    #[test]
    fn reducer_bumps_version() {
        let s = Rc::new(state());
        let next = s.clone().reduce(RadarAction::PointerUp);
        assert_eq!(next.version, s.version + 1);
    }
}
