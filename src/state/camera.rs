// Viewport camera over the map raster: pan/zoom plus the tracking flag.
use crate::config::RadarConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Recenters on the followed entity every snapshot.
    Tracking,
    /// User owns pan/zoom; recentering is suspended.
    Manual,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowTarget {
    Local,
    Entity(String),
}

impl FollowTarget {
    pub const LOCAL_KEY: &'static str = "local";
    /// Entity keys carry this prefix so no id can collide with `LOCAL_KEY`.
    const ENTITY_PREFIX: &'static str = "id:";

    /// Parse the value coming from the follow selector.
    pub fn from_key(key: &str) -> Self {
        match key.strip_prefix(Self::ENTITY_PREFIX) {
            Some(id) => FollowTarget::Entity(id.to_string()),
            None => FollowTarget::Local,
        }
    }

    pub fn key(&self) -> String {
        match self {
            FollowTarget::Local => Self::LOCAL_KEY.to_string(),
            FollowTarget::Entity(id) => format!("{}{id}", Self::ENTITY_PREFIX),
        }
    }
}

/// Screen-space transform applied to the map wrapper:
/// `screen = pan + raster_px * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub pan_x: f64,
    pub pan_y: f64,
    pub scale: f64,
}

impl Transform {
    pub fn css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan_x, self.pan_y, self.scale
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub scale: f64,
    pub mode: CameraMode,
    pub followed: FollowTarget,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Set once the first layout pass has placed the map.
    pub initialized: bool,
    drag_anchor: Option<(f64, f64)>,
    image_size: Option<(f64, f64)>,
    fallback_image_size: (f64, f64),
    min_scale: f64,
    max_scale: f64,
    zoom_sensitivity: f64,
}

impl Camera {
    pub fn new(cfg: &RadarConfig) -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: cfg.default_scale.clamp(cfg.min_scale, cfg.max_scale),
            mode: CameraMode::Tracking,
            followed: FollowTarget::Local,
            viewport_width: 0.0,
            viewport_height: 0.0,
            initialized: false,
            drag_anchor: None,
            image_size: None,
            fallback_image_size: (cfg.fallback_image_width, cfg.fallback_image_height),
            min_scale: cfg.min_scale,
            max_scale: cfg.max_scale,
            zoom_sensitivity: cfg.zoom_sensitivity,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform {
            pan_x: self.pan_x,
            pan_y: self.pan_y,
            scale: self.scale,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.mode == CameraMode::Tracking
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Natural raster size, or the fallback while the image is unknown.
    pub fn image_size(&self) -> (f64, f64) {
        self.image_size.unwrap_or(self.fallback_image_size)
    }

    pub fn set_image_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.image_size = Some((width, height));
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
    }

    /// Center the whole raster in the viewport at the current scale.
    pub fn layout_default(&mut self) {
        let (iw, ih) = self.image_size();
        self.pan_x = self.viewport_width / 2.0 - iw * self.scale / 2.0;
        self.pan_y = self.viewport_height / 2.0 - ih * self.scale / 2.0;
        self.initialized = true;
    }

    /// Put the raster point at fraction `(u, v)` in the middle of the
    /// viewport, whatever the zoom.
    pub fn center_on(&mut self, u: f64, v: f64) {
        let (iw, ih) = self.image_size();
        self.pan_x = self.viewport_width / 2.0 - u * iw * self.scale;
        self.pan_y = self.viewport_height / 2.0 - v * ih * self.scale;
    }

    /// Returns `true` only on the actual `Tracking -> Manual` flip.
    pub fn disable_tracking(&mut self) -> bool {
        if self.mode == CameraMode::Tracking {
            self.mode = CameraMode::Manual;
            true
        } else {
            false
        }
    }

    pub fn enable_tracking(&mut self) {
        self.mode = CameraMode::Tracking;
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.drag_anchor = Some((x - self.pan_x, y - self.pan_y));
    }

    /// Move the map 1:1 with the pointer. Returns `true` when this move broke
    /// tracking.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        let Some((ax, ay)) = self.drag_anchor else {
            return false;
        };
        let flipped = self.disable_tracking();
        self.pan_x = x - ax;
        self.pan_y = y - ay;
        flipped
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Wheel zoom toward the cursor. Returns `true` when it broke tracking.
    pub fn zoom_at(&mut self, cursor_x: f64, cursor_y: f64, delta_y: f64) -> bool {
        let flipped = self.disable_tracking();
        let factor = (-delta_y * self.zoom_sensitivity).exp();
        self.zoom_by(cursor_x, cursor_y, factor);
        flipped
    }

    /// Scale by `factor` (clamped to the zoom limits) keeping the raster
    /// point under `(cursor_x, cursor_y)` fixed on screen.
    pub fn zoom_by(&mut self, cursor_x: f64, cursor_y: f64, factor: f64) {
        // exp() may overflow to inf or underflow to 0; the clamp pins those.
        if factor.is_nan() || factor < 0.0 {
            return;
        }
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        let ratio = new_scale / self.scale;
        self.pan_x = cursor_x - (cursor_x - self.pan_x) * ratio;
        self.pan_y = cursor_y - (cursor_y - self.pan_y) * ratio;
        self.scale = new_scale;
    }

    #[cfg(test)]
    pub fn screen_to_raster(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.pan_x) / self.scale, (sy - self.pan_y) / self.scale)
    }

    #[cfg(test)]
    pub fn raster_to_screen(&self, px: f64, py: f64) -> (f64, f64) {
        (self.pan_x + px * self.scale, self.pan_y + py * self.scale)
    }
}
