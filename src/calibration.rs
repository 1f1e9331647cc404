//! World-to-map calibration.
//!
//! Maps game-world `(x, y)` to a fraction `(u, v)` of the map raster. The
//! world "up" axis points the opposite way of the image "down" axis, hence the
//! sign flip on `y`.

use crate::error::{RadarError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationParams {
    /// Raster pixel that world `x = 0` lands on.
    pub offset_x: f64,
    /// Raster pixel that world `y = 0` lands on.
    pub offset_y: f64,
    /// Raster pixels per world unit along x. Never zero.
    pub scale_x: f64,
    /// Raster pixels per world unit along y. Never zero.
    pub scale_y: f64,
    pub map_pixel_width: f64,
    pub map_pixel_height: f64,
}

/// One `(world, pixel)` correspondence used to derive a calibration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferencePoint {
    pub world_x: f64,
    pub world_y: f64,
    pub pixel_u: f64,
    pub pixel_v: f64,
}

impl CalibrationParams {
    /// Fit the affine transform through two reference correspondences.
    pub fn from_reference_points(
        a: ReferencePoint,
        b: ReferencePoint,
        map_pixel_width: f64,
        map_pixel_height: f64,
    ) -> Result<Self> {
        let dx = b.world_x - a.world_x;
        let dy = b.world_y - a.world_y;
        if dx == 0.0 || dy == 0.0 {
            return Err(RadarError::DegenerateCalibration);
        }
        let scale_x = (b.pixel_u - a.pixel_u) / dx;
        let scale_y = (a.pixel_v - b.pixel_v) / dy;
        if scale_x == 0.0 || scale_y == 0.0 || !scale_x.is_finite() || !scale_y.is_finite() {
            return Err(RadarError::DegenerateCalibration);
        }
        Ok(Self {
            offset_x: a.pixel_u - scale_x * a.world_x,
            offset_y: a.pixel_v + scale_y * a.world_y,
            scale_x,
            scale_y,
            map_pixel_width,
            map_pixel_height,
        })
    }

    /// Calibration that stretches a world rectangle over the whole raster:
    /// `(min_x, max_y)` lands on the top-left corner, `(max_x, min_y)` on the
    /// bottom-right one.
    pub fn from_world_bounds(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        map_pixel_width: f64,
        map_pixel_height: f64,
    ) -> Result<Self> {
        Self::from_reference_points(
            ReferencePoint {
                world_x: min_x,
                world_y: max_y,
                pixel_u: 0.0,
                pixel_v: 0.0,
            },
            ReferencePoint {
                world_x: max_x,
                world_y: min_y,
                pixel_u: map_pixel_width,
                pixel_v: map_pixel_height,
            },
            map_pixel_width,
            map_pixel_height,
        )
    }

    /// Project a world position to raster fractions, clamped to `[0, 1]` on
    /// each axis. A non-finite component is treated as `0.0`.
    pub fn world_to_map_fraction(&self, x: f64, y: f64) -> (f64, f64) {
        let x = if x.is_finite() { x } else { 0.0 };
        let y = if y.is_finite() { y } else { 0.0 };
        let px_u = self.offset_x + x * self.scale_x;
        let px_v = self.offset_y - y * self.scale_y;
        (
            clamp_unit(px_u / self.map_pixel_width),
            clamp_unit(px_v / self.map_pixel_height),
        )
    }

    pub fn set_offset_x(&mut self, value: f64) {
        if value.is_finite() {
            self.offset_x = value;
        }
    }

    pub fn set_offset_y(&mut self, value: f64) {
        if value.is_finite() {
            self.offset_y = value;
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
